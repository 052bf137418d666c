// src/db/team_repo.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        scoped_repo::{ScopedRepository, Stateful, TenantOwned},
        scoped_search::{JoinSpec, SearchSpec},
    },
    models::team::{NewTechnician, Technician, TechnicianStatus},
};

pub type TechnicianRepository = ScopedRepository<Technician>;

pub const TECHNICIAN_JOIN: JoinSpec = JoinSpec {
    table: "technicians",
    alias: "t",
    foreign_key: "technician_id",
    projection: "t.id AS technician_ref_id, t.name AS technician_ref_name, t.email AS technician_ref_email",
    text_columns: &["t.name"],
};

impl TenantOwned for Technician {
    type Listing = Technician;
    const LABEL: &'static str = "Técnico";
    const SEARCH: SearchSpec = SearchSpec {
        table: "technicians",
        alias: "t",
        join: None,
        text_columns: &["t.name", "t.email", "t.phone", "t.specialty"],
        status_column: Some("t.status"),
        category_column: Some("t.specialty"),
        date_column: None,
        order_by: "t.created_at DESC",
        default_limit: 10,
    };
}

impl Stateful for Technician {
    type Status = TechnicianStatus;
}

impl TechnicianRepository {
    pub async fn create(&self, account_id: Uuid, payload: &NewTechnician) -> Result<Technician, AppError> {
        let technician = sqlx::query_as::<_, Technician>(
            r#"
            INSERT INTO technicians (account_id, name, email, phone, specialty)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(account_id)
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.specialty)
        .fetch_one(&self.pool)
        .await?;

        Ok(technician)
    }
}
