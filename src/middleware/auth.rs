// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::i18n::Locale,
    models::auth::User,
};

// Usuário autenticado, guardado nas extensions da requisição
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
}

/// Valida o JWT e carrega o usuário dentro da conta indicada no token.
/// Usuário removido (ou de outra conta) invalida o token.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();
    let locale = Locale::from_headers(&parts.headers);

    let user = match authenticate(&app_state, &parts).await {
        Ok(user) => user,
        Err(e) => {
            return e
                .to_api_error(&locale, &app_state.i18n_store)
                .into_response();
        }
    };

    parts.extensions.insert(AuthenticatedUser(user));
    next.run(Request::from_parts(parts, body)).await
}

async fn authenticate(app_state: &AppState, parts: &Parts) -> Result<User, AppError> {
    let token = bearer_token(parts).ok_or(AppError::InvalidToken)?;
    let claims = app_state.auth_service.validate_token(token)?;

    app_state
        .auth_service
        .find_user(claims.account_id, claims.sub)
        .await?
        .ok_or(AppError::InvalidToken)
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::InvalidToken)
    }
}
