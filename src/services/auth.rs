// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, NewUser, User},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, token_ttl: Duration) -> Self {
        Self { user_repo, jwt_secret, token_ttl }
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // bcrypt é pesado: roda fora do runtime assíncrono
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!("🔑 Login de {} na conta {}", user.id, user.account_id);
        self.create_token(&user)
    }

    /// Cadastra um usuário dentro da conta de quem chama.
    pub async fn register_user(&self, account_id: Uuid, payload: &NewUser) -> Result<User, AppError> {
        let password_clone = payload.password.clone();
        let hashed_password = tokio::task::spawn_blocking(move || {
            hash(&password_clone, bcrypt::DEFAULT_COST)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        self.user_repo
            .create(
                account_id,
                payload.name.trim(),
                &payload.email,
                &hashed_password,
                payload.role,
            )
            .await
    }

    /// Só confere assinatura e validade; quem carrega o usuário é o middleware.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        Ok(token_data.claims)
    }

    pub fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + self.token_ttl;

        let claims = Claims {
            sub: user.id,
            account_id: user.account_id,
            role: user.role,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    pub async fn find_user(&self, account_id: Uuid, user_id: Uuid) -> Result<Option<User>, AppError> {
        self.user_repo.find_by_id(account_id, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use sqlx::postgres::PgPoolOptions;

    use super::*;
    use crate::models::auth::UserRole;

    fn service(secret: &str, ttl: Duration) -> AuthService {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        AuthService::new(UserRepository::new(pool), secret.to_string(), ttl)
    }

    fn user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            name: "Gerente".into(),
            email: "gerente@polonorte.com".into(),
            password_hash: String::new(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn token_carries_user_account_and_role() {
        let auth = service("segredo", Duration::hours(1));
        let user = user(UserRole::Manager);

        let token = auth.create_token(&user).unwrap();
        let claims = auth.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.account_id, user.account_id);
        assert_eq!(claims.role, UserRole::Manager);
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn foreign_or_expired_tokens_are_rejected() {
        let user = user(UserRole::Admin);

        let forged = service("outro-segredo", Duration::hours(1)).create_token(&user).unwrap();
        assert!(matches!(
            service("segredo", Duration::hours(1)).validate_token(&forged),
            Err(AppError::InvalidToken)
        ));

        let expired_issuer = service("segredo", Duration::hours(-2));
        let expired = expired_issuer.create_token(&user).unwrap();
        assert!(matches!(expired_issuer.validate_token(&expired), Err(AppError::InvalidToken)));

        assert!(matches!(expired_issuer.validate_token("lixo"), Err(AppError::InvalidToken)));
    }
}
