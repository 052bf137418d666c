// src/db/cascade.rs
//
// Portas usadas pela exclusão em cascata. O serviço só conhece estas duas
// interfaces; aqui elas ganham a implementação Postgres (uma transação).

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::scoped_repo::{ScopedRepository, TenantOwned},
    models::tenancy::Account,
};

pub type PgTx = Transaction<'static, Postgres>;

/// Uma coleção que sabe apagar tudo o que pertence a uma conta.
#[async_trait]
pub trait TenantPurge<C: Send>: Send + Sync {
    fn collection(&self) -> &'static str;

    /// Devolve o número de linhas removidas (zero é sucesso).
    async fn purge_tenant(&self, uow: &mut C, account_id: Uuid) -> Result<u64, AppError>;
}

/// O registro da conta em si, mais o controle da unidade de trabalho.
#[async_trait]
pub trait AccountDirectory<C: Send>: Send + Sync {
    async fn begin(&self) -> Result<C, AppError>;

    /// Lê e trava a conta até o fim da unidade de trabalho.
    async fn find_account(&self, uow: &mut C, id: Uuid) -> Result<Option<Account>, AppError>;

    async fn delete_account(&self, uow: &mut C, id: Uuid) -> Result<Option<Account>, AppError>;

    async fn commit(&self, uow: C) -> Result<(), AppError>;
}

#[async_trait]
impl<E: TenantOwned> TenantPurge<PgTx> for ScopedRepository<E> {
    fn collection(&self) -> &'static str {
        E::SEARCH.table
    }

    async fn purge_tenant(&self, tx: &mut PgTx, account_id: Uuid) -> Result<u64, AppError> {
        self.delete_all_by_tenant(&mut **tx, account_id).await
    }
}
