// src/services/admin_service.rs

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        pagination::{ListQuery, Paginated},
    },
    db::{cascade::PgTx, AccountRepository},
    models::tenancy::{Account, AccountErasure, AccountStatus, NewAccount},
    services::account_eraser::AccountEraser,
};

/// Operações do super admin sobre as contas da plataforma.
#[derive(Clone)]
pub struct AdminService {
    accounts: AccountRepository,
    eraser: Arc<AccountEraser<PgTx>>,
    pool: PgPool,
}

impl AdminService {
    pub fn new(accounts: AccountRepository, eraser: Arc<AccountEraser<PgTx>>, pool: PgPool) -> Self {
        Self { accounts, eraser, pool }
    }

    pub async fn list_accounts(&self, query: &ListQuery) -> Result<Paginated<Account>, AppError> {
        self.accounts.find_page(query).await
    }

    pub async fn get_account(&self, id: Uuid) -> Result<Account, AppError> {
        self.accounts
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound("Conta"))
    }

    pub async fn create_account(&self, payload: &NewAccount) -> Result<Account, AppError> {
        let account = self.accounts.create(payload).await?;
        tracing::info!("🏢 Conta '{}' criada ({})", account.name, account.id);
        Ok(account)
    }

    /// Qualquer transição é permitida (inclusive reativar uma conta suspensa).
    pub async fn update_status(&self, id: Uuid, status: AccountStatus) -> Result<Account, AppError> {
        let account = self
            .accounts
            .update_status(id, status)
            .await?
            .ok_or(AppError::NotFound("Conta"))?;
        tracing::info!("🔁 Conta {} agora está {:?}", account.id, account.status);
        Ok(account)
    }

    pub async fn erase_account(&self, id: Uuid) -> Result<AccountErasure, AppError> {
        self.eraser.erase(id).await
    }
}
