// src/handlers/admin.rs
//
// Administração da plataforma: só o super admin chega aqui.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::{
        error::ApiError,
        pagination::{ListQuery, Paginated},
    },
    config::AppState,
    handlers::scoped::validate_payload,
    middleware::{
        i18n::Locale,
        rbac::{ensure_not_own_account, PlatformAdmin, RequireRole},
    },
    models::tenancy::{Account, AccountErasure, NewAccount, UpdateAccountStatus},
};

// GET /api/admin/accounts
#[utoipa::path(
    get,
    path = "/api/admin/accounts",
    tag = "Admin",
    params(ListQuery),
    responses(
        (status = 200, description = "Contas paginadas", body = Paginated<Account>),
        (status = 403, description = "Apenas super admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_accounts(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<PlatformAdmin>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Paginated<Account>>, ApiError> {
    let page = app_state
        .admin_service
        .list_accounts(&query)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(page))
}

// POST /api/admin/accounts
#[utoipa::path(
    post,
    path = "/api/admin/accounts",
    tag = "Admin",
    request_body = NewAccount,
    responses(
        (status = 201, description = "Conta criada (pendente)", body = Account),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_account(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<PlatformAdmin>,
    Json(payload): Json<NewAccount>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload, &locale, &app_state.i18n_store)?;

    let account = app_state
        .admin_service
        .create_account(&payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(account)))
}

// GET /api/admin/accounts/{id}
#[utoipa::path(
    get,
    path = "/api/admin/accounts/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID da conta")),
    responses(
        (status = 200, description = "Conta", body = Account),
        (status = 404, description = "Conta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_account(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<PlatformAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<Account>, ApiError> {
    let account = app_state
        .admin_service
        .get_account(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(account))
}

// PATCH /api/admin/accounts/{id}/status
#[utoipa::path(
    patch,
    path = "/api/admin/accounts/{id}/status",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID da conta")),
    request_body = UpdateAccountStatus,
    responses(
        (status = 200, description = "Status alterado", body = Account),
        (status = 404, description = "Conta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_account_status(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<PlatformAdmin>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAccountStatus>,
) -> Result<Json<Account>, ApiError> {
    let account = app_state
        .admin_service
        .update_status(id, payload.status)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(account))
}

// DELETE /api/admin/accounts/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/accounts/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID da conta")),
    responses(
        (status = 200, description = "Conta e todos os dados excluídos", body = AccountErasure),
        (status = 403, description = "Não é permitido excluir a própria conta"),
        (status = 404, description = "Conta não encontrada"),
        (status = 500, description = "Falha na exclusão; nada foi alterado")
    ),
    security(("api_jwt" = []))
)]
pub async fn erase_account(
    State(app_state): State<AppState>,
    locale: Locale,
    guard: RequireRole<PlatformAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountErasure>, ApiError> {
    ensure_not_own_account(&guard.user, id)
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    tracing::warn!("⚠️ {} solicitou a exclusão da conta {}", guard.user.id, id);

    let erasure = app_state
        .admin_service
        .erase_account(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(erasure))
}
