// src/handlers/crm.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    db::{CustomerRepository, EventRepository, FollowUpRepository},
    handlers::scoped::validate_payload,
    middleware::{i18n::Locale, tenancy::TenantContext},
    models::crm::{Customer, Event, FollowUp, NewCustomer, NewEvent, NewFollowUp},
};

// POST /api/customers
#[utoipa::path(
    post,
    path = "/api/customers",
    tag = "CRM",
    request_body = NewCustomer,
    responses(
        (status = 201, description = "Cliente criado", body = Customer),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Técnico não encontrado nesta conta")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Json(payload): Json<NewCustomer>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload, &locale, &app_state.i18n_store)?;

    let customer = CustomerRepository::new(app_state.db_pool.clone())
        .create(tenant.0, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(customer)))
}

// POST /api/follow-ups
#[utoipa::path(
    post,
    path = "/api/follow-ups",
    tag = "CRM",
    request_body = NewFollowUp,
    responses(
        (status = 201, description = "Follow-up agendado", body = FollowUp),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Cliente não encontrado nesta conta")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_follow_up(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Json(payload): Json<NewFollowUp>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload, &locale, &app_state.i18n_store)?;

    let follow_up = FollowUpRepository::new(app_state.db_pool.clone())
        .create(tenant.0, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(follow_up)))
}

// POST /api/events
#[utoipa::path(
    post,
    path = "/api/events",
    tag = "CRM",
    request_body = NewEvent,
    responses(
        (status = 201, description = "Evento criado na agenda", body = Event),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_event(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Json(payload): Json<NewEvent>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload, &locale, &app_state.i18n_store)?;

    let event = EventRepository::new(app_state.db_pool.clone())
        .create(tenant.0, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(event)))
}
