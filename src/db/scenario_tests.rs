// Cenários contra um Postgres real (`DATABASE_URL`).
// Rodar com: cargo test -- --ignored

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::ListQuery},
    db::{AccountRepository, ContractRepository, CustomerRepository, FollowUpRepository},
    models::{crm::FollowUpStatus, tenancy::{AccountStatus, NewAccount}},
    services::account_eraser::AccountEraser,
};

async fn seed_account(pool: &PgPool, name: &str) -> Uuid {
    AccountRepository::new(pool.clone())
        .create(&NewAccount {
            name: name.into(),
            plan: None,
            expires_at: None,
        })
        .await
        .unwrap()
        .id
}

async fn seed_customer(pool: &PgPool, account_id: Uuid, name: &str) -> Uuid {
    sqlx::query_scalar("INSERT INTO customers (account_id, name) VALUES ($1, $2) RETURNING id")
        .bind(account_id)
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn seed_contract(pool: &PgPool, account_id: Uuid, customer_id: Uuid, title: &str) {
    sqlx::query(
        "INSERT INTO contracts (account_id, customer_id, title, start_date) VALUES ($1, $2, $3, '2024-01-01')",
    )
    .bind(account_id)
    .bind(customer_id)
    .bind(title)
    .execute(pool)
    .await
    .unwrap();
}

async fn seed_follow_up(pool: &PgPool, account_id: Uuid, customer_id: Uuid, start: &str) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO follow_ups (account_id, customer_id, title, start_date) VALUES ($1, $2, 'Retorno', $3::date) RETURNING id",
    )
    .bind(account_id)
    .bind(customer_id)
    .bind(start)
    .fetch_one(pool)
    .await
    .unwrap()
}

async fn count(pool: &PgPool, table: &str, account_id: Uuid) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE account_id = $1"))
        .bind(account_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test]
#[ignore]
async fn contract_search_matches_the_customer_name(pool: PgPool) {
    let account = seed_account(&pool, "Conta A").await;
    let acme = seed_customer(&pool, account, "ACME Corp").await;
    let other = seed_customer(&pool, account, "Padaria Central").await;
    seed_contract(&pool, account, acme, "PMOC mensal").await;
    seed_contract(&pool, account, other, "Manutenção anual").await;

    let query = ListQuery {
        search: Some("acme".into()),
        ..Default::default()
    };
    let page = ContractRepository::new(pool.clone())
        .find_page(account, &query)
        .await
        .unwrap();

    assert_eq!(page.data.len(), 1);
    assert_eq!(page.total, 1);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.data[0].customer.as_ref().unwrap().name, "ACME Corp");
}

#[sqlx::test]
#[ignore]
async fn follow_ups_come_in_ascending_start_date(pool: PgPool) {
    let account = seed_account(&pool, "Conta A").await;
    let customer = seed_customer(&pool, account, "Cliente").await;
    for start in ["2024-03-01", "2024-01-10", "2024-02-15"] {
        seed_follow_up(&pool, account, customer, start).await;
    }

    let page = FollowUpRepository::new(pool.clone())
        .find_page(account, &ListQuery::default())
        .await
        .unwrap();

    let dates: Vec<NaiveDate> = page.data.iter().map(|l| l.follow_up.start_date).collect();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted);
    assert_eq!(page.limit, 50);
}

#[sqlx::test]
#[ignore]
async fn records_of_another_account_are_invisible(pool: PgPool) {
    let mine = seed_account(&pool, "Minha").await;
    let theirs = seed_account(&pool, "Outra").await;
    let foreign = seed_customer(&pool, theirs, "Cliente alheio").await;

    let repo = CustomerRepository::new(pool.clone());
    assert!(repo.find_by_id(mine, foreign).await.unwrap().is_none());
    assert!(matches!(repo.get(mine, foreign).await, Err(AppError::NotFound(_))));
    assert!(repo.delete_by_id(mine, foreign).await.unwrap().is_none());

    let page = repo.find_page(mine, &ListQuery::default()).await.unwrap();
    assert_eq!(page.total, 0);
    assert_eq!(page.total_pages, 0);
}

#[sqlx::test]
#[ignore]
async fn erasing_an_account_leaves_nothing_behind(pool: PgPool) {
    let doomed = seed_account(&pool, "Conta A").await;
    let survivor = seed_account(&pool, "Conta B").await;

    for account in [doomed, survivor] {
        let customer = seed_customer(&pool, account, "Cliente").await;
        seed_contract(&pool, account, customer, "Contrato").await;
        seed_follow_up(&pool, account, customer, "2024-01-10").await;
    }
    let extra = seed_customer(&pool, doomed, "Outro cliente").await;
    seed_contract(&pool, doomed, extra, "Contrato 2").await;

    let eraser = AccountEraser::postgres(&pool);
    let erasure = eraser.erase(doomed).await.unwrap();

    assert_eq!(erasure.name, "Conta A");
    assert_eq!(erasure.purged.len(), eraser.collections().len());
    let deleted_of = |collection: &str| {
        erasure
            .purged
            .iter()
            .find(|p| p.collection == collection)
            .map(|p| p.deleted)
    };
    assert_eq!(deleted_of("customers"), Some(2));
    assert_eq!(deleted_of("contracts"), Some(2));
    assert_eq!(deleted_of("follow_ups"), Some(1));

    for table in eraser.collections() {
        assert_eq!(count(&pool, table, doomed).await, 0, "{table}");
    }
    assert!(AccountRepository::new(pool.clone())
        .find_by_id(&pool, doomed)
        .await
        .unwrap()
        .is_none());

    assert_eq!(count(&pool, "customers", survivor).await, 1);
    assert_eq!(count(&pool, "contracts", survivor).await, 1);
    assert_eq!(count(&pool, "follow_ups", survivor).await, 1);
}

#[sqlx::test]
#[ignore]
async fn erasing_a_missing_account_changes_nothing(pool: PgPool) {
    let account = seed_account(&pool, "Conta A").await;
    seed_customer(&pool, account, "Cliente").await;

    let result = AccountEraser::postgres(&pool).erase(Uuid::new_v4()).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(count(&pool, "customers", account).await, 1);
}

#[sqlx::test]
#[ignore]
async fn status_changes_stay_inside_the_account(pool: PgPool) {
    let mine = seed_account(&pool, "Minha").await;
    let theirs = seed_account(&pool, "Outra").await;
    let my_customer = seed_customer(&pool, mine, "Cliente").await;
    let their_customer = seed_customer(&pool, theirs, "Cliente alheio").await;
    let mine_id = seed_follow_up(&pool, mine, my_customer, "2024-01-10").await;
    seed_follow_up(&pool, mine, my_customer, "2024-01-20").await;
    let foreign_id = seed_follow_up(&pool, theirs, their_customer, "2024-01-10").await;

    let repo = FollowUpRepository::new(pool.clone());

    let untouched = repo
        .update_status(mine, foreign_id, FollowUpStatus::Done)
        .await
        .unwrap();
    assert!(untouched.is_none());
    let foreign = repo.get(theirs, foreign_id).await.unwrap();
    assert_eq!(foreign.follow_up.status, FollowUpStatus::Pending);

    let updated = repo
        .update_status(mine, mine_id, FollowUpStatus::Done)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, FollowUpStatus::Done);

    let done = ListQuery {
        status: Some("done".into()),
        ..Default::default()
    };
    let page = repo.find_page(mine, &done).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].follow_up.id, mine_id);

    let bogus = ListQuery {
        status: Some("bogus".into()),
        ..Default::default()
    };
    assert_eq!(repo.find_page(mine, &bogus).await.unwrap().total, 0);
}

#[sqlx::test]
#[ignore]
async fn new_accounts_start_pending_and_can_change_status(pool: PgPool) {
    let accounts = AccountRepository::new(pool.clone());
    let created = accounts
        .create(&NewAccount {
            name: "Refrigeração Polo Norte".into(),
            plan: None,
            expires_at: None,
        })
        .await
        .unwrap();

    assert_eq!(created.status, AccountStatus::Pending);
    assert_eq!(created.plan, "free");

    let active = accounts
        .update_status(created.id, AccountStatus::Active)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(active.status, AccountStatus::Active);

    let stored = accounts.find_by_id(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(stored.status, AccountStatus::Active);

    assert!(accounts
        .update_status(Uuid::new_v4(), AccountStatus::Suspended)
        .await
        .unwrap()
        .is_none());
}
