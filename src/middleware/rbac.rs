// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    middleware::auth::AuthenticatedUser,
    models::auth::{User, UserRole},
};

/// 1. O Trait que define um grupo de papéis autorizados
pub trait RoleDef: Send + Sync + 'static {
    fn allowed() -> &'static [UserRole];
}

/// 2. O Extractor (Guardião). Carrega o usuário já autorizado.
pub struct RequireRole<T> {
    pub user: User,
    _role: PhantomData<T>,
}

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;

        if !T::allowed().contains(&user.role) {
            tracing::warn!("⛔ {} ({:?}) barrado em {}", user.id, user.role, parts.uri.path());
            return Err(AppError::Forbidden);
        }

        Ok(RequireRole {
            user,
            _role: PhantomData,
        })
    }
}

/// O super admin não pode apagar a conta em que está logado.
pub fn ensure_not_own_account(user: &User, account_id: Uuid) -> Result<(), AppError> {
    if user.account_id == account_id {
        return Err(AppError::CannotDeleteOwnAccount);
    }
    Ok(())
}

// ---
// GRUPOS DE PAPÉIS
// ---

/// Operador da plataforma.
pub struct PlatformAdmin;
impl RoleDef for PlatformAdmin {
    fn allowed() -> &'static [UserRole] {
        &[UserRole::SuperAdmin]
    }
}

/// Quem pode apagar registros e cadastrar usuários dentro da conta.
pub struct Managers;
impl RoleDef for Managers {
    fn allowed() -> &'static [UserRole] {
        &[UserRole::SuperAdmin, UserRole::Admin, UserRole::Manager]
    }
}
