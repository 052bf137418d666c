// src/db/fleet_repo.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        scoped_repo::{ScopedRepository, Stateful, TenantOwned},
        scoped_search::{JoinSpec, SearchSpec},
        TechnicianRepository,
    },
    models::fleet::{
        Expense, NewExpense, NewVehicle, NewVehicleUsage, Vehicle, VehicleStatus, VehicleUsage,
        VehicleUsageListing,
    },
};

pub type VehicleRepository = ScopedRepository<Vehicle>;
pub type VehicleUsageRepository = ScopedRepository<VehicleUsage>;
pub type ExpenseRepository = ScopedRepository<Expense>;

pub const VEHICLE_JOIN: JoinSpec = JoinSpec {
    table: "vehicles",
    alias: "v",
    foreign_key: "vehicle_id",
    projection: "v.id AS vehicle_ref_id, v.plate AS vehicle_ref_plate, v.model AS vehicle_ref_model",
    text_columns: &["v.plate", "v.model"],
};

impl TenantOwned for Vehicle {
    type Listing = Vehicle;
    const LABEL: &'static str = "Veículo";
    const SEARCH: SearchSpec = SearchSpec {
        table: "vehicles",
        alias: "vh",
        join: None,
        text_columns: &["vh.plate", "vh.brand", "vh.model"],
        status_column: Some("vh.status"),
        category_column: None,
        date_column: None,
        order_by: "vh.created_at DESC",
        default_limit: 10,
    };
}

impl Stateful for Vehicle {
    type Status = VehicleStatus;
}

impl TenantOwned for VehicleUsage {
    type Listing = VehicleUsageListing;
    const LABEL: &'static str = "Uso de veículo";
    const SEARCH: SearchSpec = SearchSpec {
        table: "vehicle_usages",
        alias: "vu",
        join: Some(VEHICLE_JOIN),
        text_columns: &["vu.purpose"],
        status_column: None,
        category_column: None,
        date_column: Some("vu.started_at"),
        order_by: "vu.created_at DESC",
        default_limit: 10,
    };
}

impl TenantOwned for Expense {
    type Listing = Expense;
    const LABEL: &'static str = "Despesa";
    const SEARCH: SearchSpec = SearchSpec {
        table: "expenses",
        alias: "x",
        join: None,
        text_columns: &["x.description", "x.category"],
        status_column: None,
        category_column: Some("x.category"),
        date_column: Some("x.spent_on"),
        order_by: "x.created_at DESC",
        default_limit: 10,
    };
}

impl VehicleRepository {
    pub async fn create(&self, account_id: Uuid, payload: &NewVehicle) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (account_id, plate, brand, model, year)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(account_id)
        .bind(payload.plate.trim().to_uppercase())
        .bind(&payload.brand)
        .bind(&payload.model)
        .bind(payload.year)
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }
}

impl VehicleUsageRepository {
    pub async fn create(&self, account_id: Uuid, payload: &NewVehicleUsage) -> Result<VehicleUsage, AppError> {
        VehicleRepository::new(self.pool.clone())
            .ensure_exists(account_id, Some(payload.vehicle_id))
            .await?;
        TechnicianRepository::new(self.pool.clone())
            .ensure_exists(account_id, payload.technician_id)
            .await?;

        let usage = sqlx::query_as::<_, VehicleUsage>(
            r#"
            INSERT INTO vehicle_usages (
                account_id, vehicle_id, technician_id, purpose,
                start_km, end_km, started_at, ended_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(account_id)
        .bind(payload.vehicle_id)
        .bind(payload.technician_id)
        .bind(&payload.purpose)
        .bind(payload.start_km)
        .bind(payload.end_km)
        .bind(payload.started_at)
        .bind(payload.ended_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(usage)
    }
}

impl ExpenseRepository {
    pub async fn create(&self, account_id: Uuid, payload: &NewExpense) -> Result<Expense, AppError> {
        VehicleRepository::new(self.pool.clone())
            .ensure_exists(account_id, payload.vehicle_id)
            .await?;
        TechnicianRepository::new(self.pool.clone())
            .ensure_exists(account_id, payload.technician_id)
            .await?;

        let expense = sqlx::query_as::<_, Expense>(
            r#"
            INSERT INTO expenses (
                account_id, vehicle_id, technician_id, description,
                category, amount, spent_on
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(account_id)
        .bind(payload.vehicle_id)
        .bind(payload.technician_id)
        .bind(&payload.description)
        .bind(payload.category.trim().to_lowercase())
        .bind(payload.amount)
        .bind(payload.spent_on)
        .fetch_one(&self.pool)
        .await?;

        Ok(expense)
    }
}
