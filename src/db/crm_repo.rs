// src/db/crm_repo.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        scoped_repo::{ScopedRepository, Stateful, TenantOwned},
        scoped_search::{JoinSpec, SearchSpec},
        team_repo::TECHNICIAN_JOIN,
        TechnicianRepository,
    },
    models::crm::{
        Customer, CustomerListing, Event, EventListing, FollowUp, FollowUpListing,
        FollowUpStatus, NewCustomer, NewEvent, NewFollowUp,
    },
};

pub type CustomerRepository = ScopedRepository<Customer>;
pub type FollowUpRepository = ScopedRepository<FollowUp>;
pub type EventRepository = ScopedRepository<Event>;

/// Cliente resumido nas listagens de quem aponta para `customers`.
pub const CUSTOMER_JOIN: JoinSpec = JoinSpec {
    table: "customers",
    alias: "cu",
    foreign_key: "customer_id",
    projection: "cu.id AS customer_ref_id, cu.name AS customer_ref_name, cu.email AS customer_ref_email",
    text_columns: &["cu.name", "cu.email"],
};

impl TenantOwned for Customer {
    type Listing = CustomerListing;
    const LABEL: &'static str = "Cliente";
    const SEARCH: SearchSpec = SearchSpec {
        table: "customers",
        alias: "cs",
        join: Some(TECHNICIAN_JOIN),
        text_columns: &["cs.name", "cs.email", "cs.phone", "cs.document_number"],
        status_column: None,
        category_column: None,
        date_column: None,
        order_by: "cs.created_at DESC",
        default_limit: 10,
    };
}

impl TenantOwned for FollowUp {
    type Listing = FollowUpListing;
    const LABEL: &'static str = "Follow-up";
    // Agenda: o retorno mais próximo primeiro.
    const SEARCH: SearchSpec = SearchSpec {
        table: "follow_ups",
        alias: "f",
        join: Some(CUSTOMER_JOIN),
        text_columns: &["f.title", "f.notes"],
        status_column: Some("f.status"),
        category_column: None,
        date_column: Some("f.start_date"),
        order_by: "f.start_date ASC, f.created_at DESC",
        default_limit: 50,
    };
}

impl Stateful for FollowUp {
    type Status = FollowUpStatus;
}

impl TenantOwned for Event {
    type Listing = EventListing;
    const LABEL: &'static str = "Evento";
    const SEARCH: SearchSpec = SearchSpec {
        table: "events",
        alias: "e",
        join: Some(CUSTOMER_JOIN),
        text_columns: &["e.title", "e.description"],
        status_column: None,
        category_column: Some("e.kind"),
        date_column: Some("e.starts_at"),
        order_by: "e.created_at DESC",
        default_limit: 10,
    };
}

impl CustomerRepository {
    pub async fn create(&self, account_id: Uuid, payload: &NewCustomer) -> Result<Customer, AppError> {
        TechnicianRepository::new(self.pool.clone())
            .ensure_exists(account_id, payload.technician_id)
            .await?;

        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (
                account_id, technician_id, name, email, phone,
                document_number, address, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(account_id)
        .bind(payload.technician_id)
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.document_number)
        .bind(&payload.address)
        .bind(&payload.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(customer)
    }
}

impl FollowUpRepository {
    pub async fn create(&self, account_id: Uuid, payload: &NewFollowUp) -> Result<FollowUp, AppError> {
        CustomerRepository::new(self.pool.clone())
            .ensure_exists(account_id, Some(payload.customer_id))
            .await?;

        let follow_up = sqlx::query_as::<_, FollowUp>(
            r#"
            INSERT INTO follow_ups (account_id, customer_id, title, notes, start_date, due_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(account_id)
        .bind(payload.customer_id)
        .bind(&payload.title)
        .bind(&payload.notes)
        .bind(payload.start_date)
        .bind(payload.due_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(follow_up)
    }
}

impl EventRepository {
    pub async fn create(&self, account_id: Uuid, payload: &NewEvent) -> Result<Event, AppError> {
        CustomerRepository::new(self.pool.clone())
            .ensure_exists(account_id, payload.customer_id)
            .await?;
        TechnicianRepository::new(self.pool.clone())
            .ensure_exists(account_id, payload.technician_id)
            .await?;

        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (
                account_id, customer_id, technician_id, title,
                description, kind, starts_at, ends_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(account_id)
        .bind(payload.customer_id)
        .bind(payload.technician_id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(&payload.kind)
        .bind(payload.starts_at)
        .bind(payload.ends_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::pagination::ListQuery,
        db::scoped_search::{build_count_query, Scope, SearchRequest},
    };

    #[test]
    fn customer_search_reaches_the_assigned_technician() {
        let query = ListQuery {
            search: Some("joão".into()),
            ..Default::default()
        };
        let request = SearchRequest::from_query(Scope::Tenant(Uuid::new_v4()), &query, &Customer::SEARCH);
        let sql = build_count_query(&Customer::SEARCH, &request).sql().to_string();

        assert!(sql.contains("LEFT JOIN technicians t ON t.id = cs.technician_id AND t.account_id = cs.account_id"));
        assert!(sql.ends_with(
            "(cs.name ILIKE $2 OR cs.email ILIKE $3 OR cs.phone ILIKE $4 OR cs.document_number ILIKE $5 OR t.name ILIKE $6)"
        ));
    }
}
