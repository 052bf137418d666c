// src/db/tenancy_repo.rs

use async_trait::async_trait;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        pagination::{ListQuery, Paginated},
    },
    db::{
        cascade::{AccountDirectory, PgTx},
        scoped_search::{self, Scope, SearchRequest, SearchSpec},
    },
    models::tenancy::{Account, AccountStatus, NewAccount},
};

/// Contas são a raiz: não têm `account_id`, só o super admin lista todas.
pub const ACCOUNT_SEARCH: SearchSpec = SearchSpec {
    table: "accounts",
    alias: "a",
    join: None,
    text_columns: &["a.name", "a.plan"],
    status_column: Some("a.status"),
    category_column: Some("a.plan"),
    date_column: Some("a.created_at"),
    order_by: "a.created_at DESC",
    default_limit: 10,
};

#[derive(Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_page(&self, query: &ListQuery) -> Result<Paginated<Account>, AppError> {
        let request = SearchRequest::from_query(Scope::Platform, query, &ACCOUNT_SEARCH);
        scoped_search::find_page(&self.pool, &ACCOUNT_SEARCH, &request).await
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Account>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(account)
    }

    /// Conta nova começa sempre como `pending`.
    pub async fn create(&self, payload: &NewAccount) -> Result<Account, AppError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (name, plan, expires_at)
            VALUES ($1, COALESCE($2, 'free'), $3)
            RETURNING *
            "#,
        )
        .bind(payload.name.trim())
        .bind(&payload.plan)
        .bind(payload.expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(account)
    }

    pub async fn update_status(&self, id: Uuid, status: AccountStatus) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>(
            "UPDATE accounts SET status = $1 WHERE id = $2 RETURNING *",
        )
        .bind(status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Account>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let account = sqlx::query_as::<_, Account>("DELETE FROM accounts WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(account)
    }
}

// A cascata inteira roda numa transação só.
#[async_trait]
impl AccountDirectory<PgTx> for AccountRepository {
    async fn begin(&self) -> Result<PgTx, AppError> {
        Ok(self.pool.begin().await?)
    }

    async fn find_account(&self, tx: &mut PgTx, id: Uuid) -> Result<Option<Account>, AppError> {
        // FOR UPDATE: uma segunda exclusão simultânea espera e depois não acha a conta.
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(account)
    }

    async fn delete_account(&self, tx: &mut PgTx, id: Uuid) -> Result<Option<Account>, AppError> {
        self.delete(&mut **tx, id).await
    }

    async fn commit(&self, tx: PgTx) -> Result<(), AppError> {
        tx.commit().await?;
        Ok(())
    }
}
