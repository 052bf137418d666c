// src/handlers/fleet.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    db::{ExpenseRepository, VehicleRepository, VehicleUsageRepository},
    handlers::scoped::validate_payload,
    middleware::{i18n::Locale, tenancy::TenantContext},
    models::fleet::{Expense, NewExpense, NewVehicle, NewVehicleUsage, Vehicle, VehicleUsage},
};

// POST /api/vehicles
#[utoipa::path(
    post,
    path = "/api/vehicles",
    tag = "Frota",
    request_body = NewVehicle,
    responses(
        (status = 201, description = "Veículo cadastrado", body = Vehicle),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_vehicle(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Json(payload): Json<NewVehicle>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload, &locale, &app_state.i18n_store)?;

    let vehicle = VehicleRepository::new(app_state.db_pool.clone())
        .create(tenant.0, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(vehicle)))
}

// POST /api/vehicle-usages
#[utoipa::path(
    post,
    path = "/api/vehicle-usages",
    tag = "Frota",
    request_body = NewVehicleUsage,
    responses(
        (status = 201, description = "Uso registrado", body = VehicleUsage),
        (status = 400, description = "Dados inválidos (ex.: km final menor que o inicial)"),
        (status = 404, description = "Veículo ou técnico não encontrado nesta conta")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_vehicle_usage(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Json(payload): Json<NewVehicleUsage>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload, &locale, &app_state.i18n_store)?;

    let usage = VehicleUsageRepository::new(app_state.db_pool.clone())
        .create(tenant.0, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(usage)))
}

// POST /api/expenses
#[utoipa::path(
    post,
    path = "/api/expenses",
    tag = "Frota",
    request_body = NewExpense,
    responses(
        (status = 201, description = "Despesa lançada", body = Expense),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_expense(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Json(payload): Json<NewExpense>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload, &locale, &app_state.i18n_store)?;

    let expense = ExpenseRepository::new(app_state.db_pool.clone())
        .create(tenant.0, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(expense)))
}
