// src/services/account_eraser.rs
//
// Exclusão em cascata de uma conta: apaga coleção por coleção, numa ordem
// fixa que respeita as FKs, e por último o registro da conta.

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        cascade::{AccountDirectory, PgTx, TenantPurge},
        scoped_repo::{ScopedRepository, TenantOwned},
        AccountRepository,
    },
    models::{
        auth::User,
        catalog::{CatalogService, Product},
        crm::{Customer, Event, FollowUp},
        fleet::{Expense, Vehicle, VehicleUsage},
        operations::{Contract, Quote, ServiceOrder},
        team::Technician,
        tenancy::{AccountErasure, PurgedCollection},
    },
};

pub struct AccountEraser<C> {
    accounts: Arc<dyn AccountDirectory<C>>,
    steps: Vec<Arc<dyn TenantPurge<C>>>,
}

fn step<E: TenantOwned>(pool: &PgPool) -> Arc<dyn TenantPurge<PgTx>> {
    Arc::new(ScopedRepository::<E>::new(pool.clone()))
}

impl AccountEraser<PgTx> {
    pub fn postgres(pool: &PgPool) -> Self {
        let steps = vec![
            // Periféricas: apontam para clientes, técnicos e veículos,
            // então saem antes de qualquer um deles.
            step::<Contract>(pool),
            step::<VehicleUsage>(pool),
            step::<Expense>(pool),
            step::<Vehicle>(pool),
            // Núcleo, na ordem das dependências.
            step::<ServiceOrder>(pool),
            step::<Quote>(pool),
            step::<FollowUp>(pool),
            step::<Event>(pool),
            step::<Customer>(pool),
            step::<Technician>(pool),
            step::<CatalogService>(pool),
            step::<Product>(pool),
            step::<User>(pool),
        ];

        Self::new(Arc::new(AccountRepository::new(pool.clone())), steps)
    }
}

impl<C: Send> AccountEraser<C> {
    pub fn new(accounts: Arc<dyn AccountDirectory<C>>, steps: Vec<Arc<dyn TenantPurge<C>>>) -> Self {
        Self { accounts, steps }
    }

    /// Coleções na ordem em que são apagadas.
    pub fn collections(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.collection()).collect()
    }

    /// Tudo acontece na mesma unidade de trabalho: se uma etapa falha,
    /// nada é confirmado e a conta continua intacta.
    pub async fn erase(&self, account_id: Uuid) -> Result<AccountErasure, AppError> {
        let mut uow = self.accounts.begin().await?;

        let account = self
            .accounts
            .find_account(&mut uow, account_id)
            .await?
            .ok_or(AppError::NotFound("Conta"))?;

        tracing::info!("🗑️ Iniciando exclusão da conta '{}' ({})", account.name, account.id);

        let mut purged = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            let deleted = step.purge_tenant(&mut uow, account_id).await?;
            tracing::info!(collection = step.collection(), deleted, "   ↳ coleção limpa");
            purged.push(PurgedCollection {
                collection: step.collection().to_string(),
                deleted,
            });
        }

        let deleted = self
            .accounts
            .delete_account(&mut uow, account_id)
            .await?
            .ok_or(AppError::DeletionFailed)?;

        self.accounts.commit(uow).await?;

        tracing::info!("✅ Conta '{}' excluída", deleted.name);

        Ok(AccountErasure {
            id: deleted.id,
            message: format!("Conta '{}' e todos os seus dados foram excluídos.", deleted.name),
            name: deleted.name,
            purged,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::Mutex,
    };

    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::models::tenancy::{Account, AccountStatus};

    const CORE: [&str; 9] = [
        "service_orders",
        "quotes",
        "follow_ups",
        "events",
        "customers",
        "technicians",
        "services",
        "products",
        "users",
    ];

    // Banco em memória: dono (account_id) de cada linha, por coleção.
    #[derive(Clone, Default)]
    struct Store {
        rows: HashMap<&'static str, Vec<Uuid>>,
        accounts: HashMap<Uuid, Account>,
    }

    // A "transação" trabalha numa cópia; só o commit grava de volta.
    struct FakeTx {
        staged: Store,
    }

    struct FakeDirectory {
        db: Arc<Mutex<Store>>,
        commits: Mutex<u32>,
        account_vanishes: bool,
    }

    #[async_trait]
    impl AccountDirectory<FakeTx> for FakeDirectory {
        async fn begin(&self) -> Result<FakeTx, AppError> {
            let staged = self.db.lock().unwrap().clone();
            Ok(FakeTx { staged })
        }

        async fn find_account(&self, tx: &mut FakeTx, id: Uuid) -> Result<Option<Account>, AppError> {
            Ok(tx.staged.accounts.get(&id).cloned())
        }

        async fn delete_account(&self, tx: &mut FakeTx, id: Uuid) -> Result<Option<Account>, AppError> {
            if self.account_vanishes {
                return Ok(None);
            }
            Ok(tx.staged.accounts.remove(&id))
        }

        async fn commit(&self, tx: FakeTx) -> Result<(), AppError> {
            *self.db.lock().unwrap() = tx.staged;
            *self.commits.lock().unwrap() += 1;
            Ok(())
        }
    }

    struct FakeCollection {
        name: &'static str,
        fails: bool,
    }

    #[async_trait]
    impl TenantPurge<FakeTx> for FakeCollection {
        fn collection(&self) -> &'static str {
            self.name
        }

        async fn purge_tenant(&self, tx: &mut FakeTx, account_id: Uuid) -> Result<u64, AppError> {
            if self.fails {
                return Err(anyhow::anyhow!("falha simulada em {}", self.name).into());
            }
            let rows = tx.staged.rows.entry(self.name).or_default();
            let before = rows.len();
            rows.retain(|owner| *owner != account_id);
            Ok((before - rows.len()) as u64)
        }
    }

    struct Fixture {
        db: Arc<Mutex<Store>>,
        directory: Arc<FakeDirectory>,
        eraser: AccountEraser<FakeTx>,
    }

    fn account(name: &str) -> Account {
        Account {
            id: Uuid::new_v4(),
            name: name.to_string(),
            plan: "pro".into(),
            status: AccountStatus::Active,
            created_at: Utc::now(),
            expires_at: None,
        }
    }

    fn fixture(store: Store, failing: Option<&'static str>, account_vanishes: bool) -> Fixture {
        let db = Arc::new(Mutex::new(store));
        let directory = Arc::new(FakeDirectory {
            db: db.clone(),
            commits: Mutex::new(0),
            account_vanishes,
        });
        let steps = CORE
            .iter()
            .map(|name| {
                Arc::new(FakeCollection {
                    name: *name,
                    fails: failing == Some(*name),
                }) as Arc<dyn TenantPurge<FakeTx>>
            })
            .collect();

        Fixture {
            db,
            eraser: AccountEraser::new(directory.clone(), steps),
            directory,
        }
    }

    fn seed(store: &mut Store, collection: &'static str, owner: Uuid, count: usize) {
        store
            .rows
            .entry(collection)
            .or_default()
            .extend(std::iter::repeat_n(owner, count));
    }

    fn remaining(db: &Arc<Mutex<Store>>, collection: &str, owner: Uuid) -> usize {
        db.lock()
            .unwrap()
            .rows
            .get(collection)
            .map(|rows| rows.iter().filter(|o| **o == owner).count())
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn erases_every_collection_then_the_account() {
        let target = account("Polo Norte");
        let other = account("Vizinha");
        let mut store = Store::default();
        for name in CORE {
            seed(&mut store, name, target.id, 2);
            seed(&mut store, name, other.id, 1);
        }
        store.accounts.insert(target.id, target.clone());
        store.accounts.insert(other.id, other.clone());

        let fx = fixture(store, None, false);
        let result = fx.eraser.erase(target.id).await.unwrap();

        assert_eq!(result.id, target.id);
        assert_eq!(result.name, "Polo Norte");
        let order: Vec<&str> = result.purged.iter().map(|p| p.collection.as_str()).collect();
        assert_eq!(order, CORE);
        assert!(result.purged.iter().all(|p| p.deleted == 2));

        for name in CORE {
            assert_eq!(remaining(&fx.db, name, target.id), 0);
            assert_eq!(remaining(&fx.db, name, other.id), 1);
        }
        let db = fx.db.lock().unwrap();
        assert!(!db.accounts.contains_key(&target.id));
        assert!(db.accounts.contains_key(&other.id));
    }

    #[tokio::test]
    async fn account_without_data_is_still_erased() {
        let target = account("Vazia");
        let mut store = Store::default();
        store.accounts.insert(target.id, target.clone());

        let fx = fixture(store, None, false);
        let result = fx.eraser.erase(target.id).await.unwrap();

        assert_eq!(result.purged.len(), CORE.len());
        assert!(result.purged.iter().all(|p| p.deleted == 0));
        assert!(fx.db.lock().unwrap().accounts.is_empty());
    }

    #[tokio::test]
    async fn reports_counts_per_collection() {
        let target = account("Cenário A");
        let mut store = Store::default();
        seed(&mut store, "technicians", target.id, 3);
        seed(&mut store, "services", target.id, 2);
        store.accounts.insert(target.id, target.clone());

        let fx = fixture(store, None, false);
        let result = fx.eraser.erase(target.id).await.unwrap();

        let count = |name: &str| {
            result
                .purged
                .iter()
                .find(|p| p.collection == name)
                .map(|p| p.deleted)
        };
        assert_eq!(count("technicians"), Some(3));
        assert_eq!(count("services"), Some(2));
        assert_eq!(count("products"), Some(0));
    }

    #[tokio::test]
    async fn unknown_account_is_not_found_and_nothing_is_touched() {
        let other = account("Outra");
        let mut store = Store::default();
        seed(&mut store, "customers", other.id, 4);
        store.accounts.insert(other.id, other.clone());

        let fx = fixture(store, None, false);
        let err = fx.eraser.erase(Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound("Conta")));
        assert_eq!(remaining(&fx.db, "customers", other.id), 4);
        assert_eq!(*fx.directory.commits.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn failing_step_rolls_everything_back() {
        let target = account("Instável");
        let mut store = Store::default();
        for name in CORE {
            seed(&mut store, name, target.id, 1);
        }
        store.accounts.insert(target.id, target.clone());

        let fx = fixture(store, Some("customers"), false);
        let err = fx.eraser.erase(target.id).await.unwrap_err();

        assert!(matches!(err, AppError::InternalServerError(_)));
        assert_eq!(*fx.directory.commits.lock().unwrap(), 0);
        // Nem as etapas anteriores à falha foram confirmadas.
        assert_eq!(remaining(&fx.db, "service_orders", target.id), 1);
        assert!(fx.db.lock().unwrap().accounts.contains_key(&target.id));
    }

    #[tokio::test]
    async fn missing_final_delete_is_deletion_failed() {
        let target = account("Fantasma");
        let mut store = Store::default();
        store.accounts.insert(target.id, target.clone());

        let fx = fixture(store, None, true);
        let err = fx.eraser.erase(target.id).await.unwrap_err();

        assert!(matches!(err, AppError::DeletionFailed));
        assert_eq!(*fx.directory.commits.lock().unwrap(), 0);
    }

    // Pega `CREATE TABLE x (... REFERENCES y(id) ...)` da migration.
    fn foreign_keys() -> HashMap<String, Vec<String>> {
        let schema = include_str!("../../migrations/20250101000000_initial_schema.sql");
        let mut refs = HashMap::new();
        for chunk in schema.split("CREATE TABLE ").skip(1) {
            let Some((table, rest)) = chunk.split_once(" (") else {
                continue;
            };
            let body = rest.split(");").next().unwrap_or_default();
            let targets = body
                .split("REFERENCES ")
                .skip(1)
                .filter_map(|r| r.split('(').next())
                .map(|t| t.trim().to_string())
                .collect();
            refs.insert(table.trim().to_string(), targets);
        }
        refs
    }

    #[tokio::test]
    async fn postgres_order_respects_the_schema() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let order = AccountEraser::postgres(&pool).collections();

        // O núcleo aparece inteiro, contíguo e na ordem fixa.
        let start = order.iter().position(|c| *c == CORE[0]).unwrap();
        assert_eq!(&order[start..start + CORE.len()], CORE.as_slice());

        // Toda tabela com `account_id` está na cascata.
        let fks = foreign_keys();
        for (table, targets) in &fks {
            if targets.iter().any(|t| t == "accounts") {
                assert!(order.iter().any(|c| *c == table.as_str()), "{table} fora da cascata");
            }
        }

        // Quem referencia sai antes de quem é referenciado.
        for (i, table) in order.iter().enumerate() {
            for target in &fks[*table] {
                if target == "accounts" || target == table {
                    continue;
                }
                let j = order.iter().position(|c| c == target).unwrap();
                assert!(i < j, "{table} deveria sair antes de {target}");
            }
        }
    }
}
