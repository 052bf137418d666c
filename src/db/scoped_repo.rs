// src/db/scoped_repo.rs

use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};
use sqlx::{postgres::PgRow, Encode, Executor, FromRow, PgPool, Postgres, Type};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        pagination::{ListQuery, Paginated},
    },
    db::scoped_search::{self, Scope, SearchRequest, SearchSpec},
};

/// Entidade que pertence a exatamente uma conta (coluna `account_id`).
pub trait TenantOwned:
    for<'r> FromRow<'r, PgRow> + Serialize + Send + Sync + Unpin + 'static
{
    /// O que as listagens devolvem: a própria linha ou a linha + referência resumida.
    type Listing: for<'r> FromRow<'r, PgRow> + Serialize + Send + Sync + Unpin + 'static;

    /// Nome exibido no `NotFound`.
    const LABEL: &'static str;
    const SEARCH: SearchSpec;
}

/// Entidades com coluna `status` alterável via PATCH.
pub trait Stateful: TenantOwned {
    type Status: for<'q> Encode<'q, Postgres> + Type<Postgres> + DeserializeOwned + Send + Sync + 'static;
}

/// CRUD com escopo de conta, o mesmo para todas as entidades.
/// Os `create` de cada uma ficam em blocos `impl` nos arquivos de domínio.
pub struct ScopedRepository<E> {
    pub(super) pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for ScopedRepository<E> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

impl<E> ScopedRepository<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }
}

impl<E: TenantOwned> ScopedRepository<E> {
    pub async fn find_page(
        &self,
        account_id: Uuid,
        query: &ListQuery,
    ) -> Result<Paginated<E::Listing>, AppError> {
        let request = SearchRequest::from_query(Scope::Tenant(account_id), query, &E::SEARCH);
        scoped_search::find_page(&self.pool, &E::SEARCH, &request).await
    }

    /// Registro de outra conta também volta `None`.
    pub async fn find_by_id(&self, account_id: Uuid, id: Uuid) -> Result<Option<E::Listing>, AppError> {
        let mut qb = scoped_search::build_lookup_query(&E::SEARCH, account_id, id);

        let row = qb
            .build_query_as::<E::Listing>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn get(&self, account_id: Uuid, id: Uuid) -> Result<E::Listing, AppError> {
        self.find_by_id(account_id, id)
            .await?
            .ok_or(AppError::NotFound(E::LABEL))
    }

    /// Confere que uma referência opcional aponta para um registro da mesma conta.
    pub async fn ensure_exists(&self, account_id: Uuid, id: Option<Uuid>) -> Result<(), AppError> {
        let Some(id) = id else {
            return Ok(());
        };

        let sql = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1 AND account_id = $2)",
            E::SEARCH.table
        );
        let exists: bool = sqlx::query_scalar(&sql)
            .bind(id)
            .bind(account_id)
            .fetch_one(&self.pool)
            .await?;

        if exists {
            Ok(())
        } else {
            Err(AppError::NotFound(E::LABEL))
        }
    }

    pub async fn delete_by_id(&self, account_id: Uuid, id: Uuid) -> Result<Option<E>, AppError> {
        let sql = format!(
            "DELETE FROM {} WHERE id = $1 AND account_id = $2 RETURNING *",
            E::SEARCH.table
        );

        sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                    AppError::RecordInUse
                }
                _ => e.into(),
            })
    }

    /// Remove todas as linhas da conta. Zero linhas também é sucesso.
    pub async fn delete_all_by_tenant<'e, Ex>(
        &self,
        executor: Ex,
        account_id: Uuid,
    ) -> Result<u64, AppError>
    where
        Ex: Executor<'e, Database = Postgres>,
    {
        let sql = format!("DELETE FROM {} WHERE account_id = $1", E::SEARCH.table);
        let result = sqlx::query(&sql).bind(account_id).execute(executor).await?;
        Ok(result.rows_affected())
    }
}

impl<E: Stateful> ScopedRepository<E> {
    pub async fn update_status(
        &self,
        account_id: Uuid,
        id: Uuid,
        status: E::Status,
    ) -> Result<Option<E>, AppError> {
        let sql = format!(
            "UPDATE {} SET status = $1, updated_at = NOW() WHERE id = $2 AND account_id = $3 RETURNING *",
            E::SEARCH.table
        );

        let row = sqlx::query_as::<_, E>(&sql)
            .bind(status)
            .bind(id)
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}
