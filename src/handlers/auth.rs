// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    handlers::scoped::validate_payload,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{Managers, RequireRole},
    },
    models::auth::{AuthResponse, LoginUserPayload, NewUser, User, UserRole},
};

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login realizado", body = AuthResponse),
        (status = 401, description = "E-mail ou senha inválidos")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<LoginUserPayload>,
) -> Result<Json<AuthResponse>, ApiError> {
    validate_payload(&payload, &locale, &app_state.i18n_store)?;

    let token = app_state
        .auth_service
        .login_user(&payload.email, &payload.password)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(AuthResponse { token }))
}

// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Usuário logado", body = User),
        (status = 401, description = "Token inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}

// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = NewUser,
    responses(
        (status = 201, description = "Usuário criado na conta", body = User),
        (status = 403, description = "Sem permissão"),
        (status = 409, description = "E-mail já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    locale: Locale,
    guard: RequireRole<Managers>,
    Json(payload): Json<NewUser>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload, &locale, &app_state.i18n_store)?;

    // Só o operador da plataforma cria outro super admin.
    if payload.role == UserRole::SuperAdmin && guard.user.role != UserRole::SuperAdmin {
        return Err(AppError::Forbidden.to_api_error(&locale, &app_state.i18n_store));
    }

    let user = app_state
        .auth_service
        .register_user(guard.user.account_id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    tracing::info!("👤 Usuário {} criado na conta {}", user.id, user.account_id);
    Ok((StatusCode::CREATED, Json(user)))
}
