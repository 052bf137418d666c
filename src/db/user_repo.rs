// src/db/user_repo.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        scoped_repo::{ScopedRepository, TenantOwned},
        scoped_search::SearchSpec,
    },
    models::auth::{User, UserRole},
};

// Usuários também pertencem a uma conta; o e-mail é único na plataforma.
pub type UserRepository = ScopedRepository<User>;

impl TenantOwned for User {
    type Listing = User;
    const LABEL: &'static str = "Usuário";
    const SEARCH: SearchSpec = SearchSpec {
        table: "users",
        alias: "u",
        join: None,
        text_columns: &["u.name", "u.email"],
        status_column: None,
        category_column: Some("u.role"),
        date_column: None,
        order_by: "u.created_at DESC",
        default_limit: 10,
    };
}

impl UserRepository {
    /// Login: a única busca sem conta, porque o e-mail identifica o usuário.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn create(
        &self,
        account_id: Uuid,
        name: &str,
        email: &str,
        password_hash: &str,
        role: UserRole,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (account_id, name, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(account_id)
        .bind(name)
        .bind(email.trim().to_lowercase())
        .bind(password_hash)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })
    }
}
