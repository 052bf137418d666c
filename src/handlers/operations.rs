// src/handlers/operations.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    db::{ContractRepository, QuoteRepository, ServiceOrderRepository},
    handlers::scoped::validate_payload,
    middleware::{i18n::Locale, tenancy::TenantContext},
    models::operations::{Contract, NewContract, NewQuote, NewServiceOrder, Quote, ServiceOrder},
};

// POST /api/service-orders
#[utoipa::path(
    post,
    path = "/api/service-orders",
    tag = "Operações",
    request_body = NewServiceOrder,
    responses(
        (status = 201, description = "Ordem de serviço aberta", body = ServiceOrder),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Cliente, técnico ou serviço não encontrado nesta conta")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_service_order(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Json(payload): Json<NewServiceOrder>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload, &locale, &app_state.i18n_store)?;

    let order = ServiceOrderRepository::new(app_state.db_pool.clone())
        .create(tenant.0, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    tracing::info!("🧾 OS {} aberta na conta {}", order.id, tenant.0);
    Ok((StatusCode::CREATED, Json(order)))
}

// POST /api/quotes
#[utoipa::path(
    post,
    path = "/api/quotes",
    tag = "Operações",
    request_body = NewQuote,
    responses(
        (status = 201, description = "Orçamento criado", body = Quote),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Cliente ou serviço não encontrado nesta conta")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_quote(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Json(payload): Json<NewQuote>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload, &locale, &app_state.i18n_store)?;

    let quote = QuoteRepository::new(app_state.db_pool.clone())
        .create(tenant.0, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(quote)))
}

// POST /api/contracts
#[utoipa::path(
    post,
    path = "/api/contracts",
    tag = "Operações",
    request_body = NewContract,
    responses(
        (status = 201, description = "Contrato criado", body = Contract),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Cliente não encontrado nesta conta")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_contract(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Json(payload): Json<NewContract>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload, &locale, &app_state.i18n_store)?;

    let contract = ContractRepository::new(app_state.db_pool.clone())
        .create(tenant.0, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(contract)))
}
