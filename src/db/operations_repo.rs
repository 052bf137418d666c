// src/db/operations_repo.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        crm_repo::CUSTOMER_JOIN,
        scoped_repo::{ScopedRepository, Stateful, TenantOwned},
        scoped_search::SearchSpec,
        CatalogServiceRepository, CustomerRepository, TechnicianRepository,
    },
    models::operations::{
        Contract, ContractListing, ContractStatus, NewContract, NewQuote, NewServiceOrder, Quote,
        QuoteListing, QuoteStatus, ServiceOrder, ServiceOrderListing, ServiceOrderStatus,
    },
};

pub type ServiceOrderRepository = ScopedRepository<ServiceOrder>;
pub type QuoteRepository = ScopedRepository<Quote>;
pub type ContractRepository = ScopedRepository<Contract>;

impl TenantOwned for ServiceOrder {
    type Listing = ServiceOrderListing;
    const LABEL: &'static str = "Ordem de serviço";
    const SEARCH: SearchSpec = SearchSpec {
        table: "service_orders",
        alias: "so",
        join: Some(CUSTOMER_JOIN),
        text_columns: &["so.description"],
        status_column: Some("so.status"),
        category_column: None,
        date_column: Some("so.scheduled_for"),
        order_by: "so.created_at DESC",
        default_limit: 10,
    };
}

impl Stateful for ServiceOrder {
    type Status = ServiceOrderStatus;
}

impl TenantOwned for Quote {
    type Listing = QuoteListing;
    const LABEL: &'static str = "Orçamento";
    const SEARCH: SearchSpec = SearchSpec {
        table: "quotes",
        alias: "q",
        join: Some(CUSTOMER_JOIN),
        text_columns: &["q.title", "q.description"],
        status_column: Some("q.status"),
        category_column: None,
        date_column: Some("q.valid_until"),
        order_by: "q.created_at DESC",
        default_limit: 10,
    };
}

impl Stateful for Quote {
    type Status = QuoteStatus;
}

impl TenantOwned for Contract {
    type Listing = ContractListing;
    const LABEL: &'static str = "Contrato";
    const SEARCH: SearchSpec = SearchSpec {
        table: "contracts",
        alias: "c",
        join: Some(CUSTOMER_JOIN),
        text_columns: &["c.title", "c.description"],
        status_column: Some("c.status"),
        category_column: None,
        date_column: Some("c.start_date"),
        order_by: "c.created_at DESC",
        default_limit: 10,
    };
}

impl Stateful for Contract {
    type Status = ContractStatus;
}

impl ServiceOrderRepository {
    pub async fn create(&self, account_id: Uuid, payload: &NewServiceOrder) -> Result<ServiceOrder, AppError> {
        CustomerRepository::new(self.pool.clone())
            .ensure_exists(account_id, Some(payload.customer_id))
            .await?;
        TechnicianRepository::new(self.pool.clone())
            .ensure_exists(account_id, payload.technician_id)
            .await?;
        CatalogServiceRepository::new(self.pool.clone())
            .ensure_exists(account_id, payload.service_id)
            .await?;

        let order = sqlx::query_as::<_, ServiceOrder>(
            r#"
            INSERT INTO service_orders (
                account_id, customer_id, technician_id, service_id,
                description, scheduled_for, total_amount
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(account_id)
        .bind(payload.customer_id)
        .bind(payload.technician_id)
        .bind(payload.service_id)
        .bind(&payload.description)
        .bind(payload.scheduled_for)
        .bind(payload.total_amount)
        .fetch_one(&self.pool)
        .await?;

        Ok(order)
    }
}

impl QuoteRepository {
    pub async fn create(&self, account_id: Uuid, payload: &NewQuote) -> Result<Quote, AppError> {
        CustomerRepository::new(self.pool.clone())
            .ensure_exists(account_id, Some(payload.customer_id))
            .await?;
        CatalogServiceRepository::new(self.pool.clone())
            .ensure_exists(account_id, payload.service_id)
            .await?;

        let quote = sqlx::query_as::<_, Quote>(
            r#"
            INSERT INTO quotes (
                account_id, customer_id, service_id, title,
                description, total_amount, valid_until
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(account_id)
        .bind(payload.customer_id)
        .bind(payload.service_id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(payload.total_amount)
        .bind(payload.valid_until)
        .fetch_one(&self.pool)
        .await?;

        Ok(quote)
    }
}

impl ContractRepository {
    pub async fn create(&self, account_id: Uuid, payload: &NewContract) -> Result<Contract, AppError> {
        CustomerRepository::new(self.pool.clone())
            .ensure_exists(account_id, Some(payload.customer_id))
            .await?;

        let contract = sqlx::query_as::<_, Contract>(
            r#"
            INSERT INTO contracts (
                account_id, customer_id, title, description,
                monthly_value, start_date, end_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(account_id)
        .bind(payload.customer_id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(payload.monthly_value)
        .bind(payload.start_date)
        .bind(payload.end_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(contract)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::pagination::ListQuery,
        db::scoped_search::{build_page_query, Scope, SearchRequest},
    };

    #[test]
    fn contracts_filter_by_status_and_start_date() {
        let query = ListQuery {
            search: Some("acme".into()),
            status: Some("active".into()),
            from: Some("2024-01-01".into()),
            to: Some("2024-12-31".into()),
            ..Default::default()
        };
        let request = SearchRequest::from_query(Scope::Tenant(Uuid::new_v4()), &query, &Contract::SEARCH);
        let sql = build_page_query(&Contract::SEARCH, &request).sql().to_string();

        assert!(sql.contains(
            "WHERE c.account_id = $1 \
             AND (c.title ILIKE $2 OR c.description ILIKE $3 OR cu.name ILIKE $4 OR cu.email ILIKE $5) \
             AND c.status::text = $6 AND c.start_date::date >= $7 AND c.start_date::date <= $8"
        ));
        assert!(sql.ends_with("ORDER BY c.created_at DESC, c.id LIMIT $9 OFFSET $10"));
    }

    #[test]
    fn service_order_search_accepts_an_id() {
        let id = Uuid::new_v4();
        let request = SearchRequest::new(
            Scope::Tenant(Uuid::new_v4()),
            crate::common::pagination::PageParams { page: 1, limit: 10 },
        )
        .with_search(&id.to_string());
        let sql = build_page_query(&ServiceOrder::SEARCH, &request).sql().to_string();

        assert!(sql.contains("(so.description ILIKE $2 OR cu.name ILIKE $3 OR cu.email ILIKE $4 OR so.id = $5)"));
    }
}
