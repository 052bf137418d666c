// src/handlers/catalog.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    db::{CatalogServiceRepository, ProductRepository},
    handlers::scoped::validate_payload,
    middleware::{i18n::Locale, tenancy::TenantContext},
    models::catalog::{CatalogService, NewCatalogService, NewProduct, Product},
};

// POST /api/services
#[utoipa::path(
    post,
    path = "/api/services",
    tag = "Catálogo",
    request_body = NewCatalogService,
    responses(
        (status = 201, description = "Serviço adicionado ao catálogo", body = CatalogService),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_service(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Json(payload): Json<NewCatalogService>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload, &locale, &app_state.i18n_store)?;

    let service = CatalogServiceRepository::new(app_state.db_pool.clone())
        .create(tenant.0, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(service)))
}

// POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Catálogo",
    request_body = NewProduct,
    responses(
        (status = 201, description = "Produto cadastrado", body = Product),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Json(payload): Json<NewProduct>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload, &locale, &app_state.i18n_store)?;

    let product = ProductRepository::new(app_state.db_pool.clone())
        .create(tenant.0, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(product)))
}
