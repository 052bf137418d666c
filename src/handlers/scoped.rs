// src/handlers/scoped.rs
//
// Handlers genéricos: listar, buscar, excluir e trocar status funcionam igual
// para toda entidade da conta. Só o POST de criação é específico.

use axum::{
    extract::{Path, Query, State},
    handler::Handler,
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        i18n::I18nStore,
        pagination::{ListQuery, Paginated},
    },
    config::AppState,
    db::scoped_repo::{ScopedRepository, Stateful, TenantOwned},
    middleware::{
        i18n::Locale,
        rbac::{Managers, RequireRole},
        tenancy::TenantContext,
    },
};

#[derive(Debug, Deserialize)]
pub struct StatusPayload<S> {
    pub status: S,
}

/// Valida o corpo da requisição já devolvendo o erro traduzido.
pub fn validate_payload<P: Validate>(payload: &P, locale: &Locale, store: &I18nStore) -> Result<(), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(locale, store))
}

// GET /api/<entidade>?page=&limit=&search=&status=&category=&from=&to=
pub async fn list<E: TenantOwned>(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Query(query): Query<ListQuery>,
) -> Result<Json<Paginated<E::Listing>>, ApiError> {
    let page = ScopedRepository::<E>::new(app_state.db_pool.clone())
        .find_page(tenant.0, &query)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(page))
}

// GET /api/<entidade>/{id}
pub async fn fetch<E: TenantOwned>(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<Json<E::Listing>, ApiError> {
    let record = ScopedRepository::<E>::new(app_state.db_pool.clone())
        .get(tenant.0, id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(record))
}

// DELETE /api/<entidade>/{id}
pub async fn remove<E: TenantOwned>(
    State(app_state): State<AppState>,
    locale: Locale,
    guard: RequireRole<Managers>,
    Path(id): Path<Uuid>,
) -> Result<Json<E>, ApiError> {
    let account_id = guard.user.account_id;

    let deleted = ScopedRepository::<E>::new(app_state.db_pool.clone())
        .delete_by_id(account_id, id)
        .await
        .and_then(|row| row.ok_or(AppError::NotFound(E::LABEL)))
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    tracing::info!("🗑️ {} {} excluído por {}", E::LABEL, id, guard.user.id);
    Ok(Json(deleted))
}

// PATCH /api/<entidade>/{id}/status
pub async fn update_status<E: Stateful>(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusPayload<E::Status>>,
) -> Result<Json<E>, ApiError> {
    let updated = ScopedRepository::<E>::new(app_state.db_pool.clone())
        .update_status(tenant.0, id, payload.status)
        .await
        .and_then(|row| row.ok_or(AppError::NotFound(E::LABEL)))
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(updated))
}

/// `/` (GET lista, POST cria) e `/{id}` (GET, DELETE) para uma entidade.
pub fn resource<E, H, T>(create: H) -> Router<AppState>
where
    E: TenantOwned,
    H: Handler<T, AppState>,
    T: 'static,
{
    Router::new()
        .route("/", get(list::<E>).post(create))
        .route("/{id}", get(fetch::<E>).delete(remove::<E>))
}

/// Acrescenta `PATCH /{id}/status`.
pub fn with_status<E: Stateful>(router: Router<AppState>) -> Router<AppState> {
    router.route("/{id}/status", patch(update_status::<E>))
}
