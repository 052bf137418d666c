// src/handlers/team.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    db::TechnicianRepository,
    handlers::scoped::validate_payload,
    middleware::{i18n::Locale, tenancy::TenantContext},
    models::team::{NewTechnician, Technician},
};

// POST /api/technicians
#[utoipa::path(
    post,
    path = "/api/technicians",
    tag = "Equipe",
    request_body = NewTechnician,
    responses(
        (status = 201, description = "Técnico cadastrado", body = Technician),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_technician(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Json(payload): Json<NewTechnician>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload, &locale, &app_state.i18n_store)?;

    let technician = TechnicianRepository::new(app_state.db_pool.clone())
        .create(tenant.0, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(technician)))
}
