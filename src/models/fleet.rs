// src/models/fleet.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "vehicle_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Available,
    InUse,
    Maintenance,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    #[schema(ignore)]
    pub account_id: Uuid,
    #[schema(example = "ABC1D23")]
    pub plate: String,
    #[schema(example = "Fiat")]
    pub brand: Option<String>,
    #[schema(example = "Fiorino")]
    pub model: Option<String>,
    #[schema(example = 2021)]
    pub year: Option<i32>,
    pub status: VehicleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewVehicle {
    #[validate(length(min = 1, message = "required"))]
    pub plate: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    #[validate(range(min = 1900, max = 2100, message = "invalid_year"))]
    pub year: Option<i32>,
}

/// Veículo resumido para junções.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRef {
    pub id: Uuid,
    pub plate: String,
    pub model: Option<String>,
}

impl VehicleRef {
    pub fn from_joined(row: &PgRow) -> Result<Option<Self>, sqlx::Error> {
        let id: Option<Uuid> = row.try_get("vehicle_ref_id")?;
        match id {
            Some(id) => Ok(Some(Self {
                id,
                plate: row.try_get("vehicle_ref_plate")?,
                model: row.try_get("vehicle_ref_model")?,
            })),
            None => Ok(None),
        }
    }
}

// Registro de uso de um veículo (saída/retorno com quilometragem)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleUsage {
    pub id: Uuid,
    #[schema(ignore)]
    pub account_id: Uuid,
    pub vehicle_id: Uuid,
    pub technician_id: Option<Uuid>,
    #[schema(example = "Atendimento OS 1024")]
    pub purpose: Option<String>,
    #[schema(example = 48210)]
    pub start_km: i32,
    pub end_km: Option<i32>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_odometer"))]
pub struct NewVehicleUsage {
    pub vehicle_id: Uuid,
    pub technician_id: Option<Uuid>,
    pub purpose: Option<String>,
    #[validate(range(min = 0, message = "invalid_km"))]
    pub start_km: i32,
    pub end_km: Option<i32>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

fn validate_odometer(usage: &NewVehicleUsage) -> Result<(), validator::ValidationError> {
    match usage.end_km {
        Some(end_km) if end_km < usage.start_km => {
            let mut error = validator::ValidationError::new("end_km_before_start_km");
            error.message = Some("end_km_before_start_km".into());
            Err(error)
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleUsageListing {
    #[serde(flatten)]
    pub usage: VehicleUsage,
    pub vehicle: Option<VehicleRef>,
}

impl<'r> FromRow<'r, PgRow> for VehicleUsageListing {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            usage: VehicleUsage::from_row(row)?,
            vehicle: VehicleRef::from_joined(row)?,
        })
    }
}

// --- Despesas (combustível, pedágio, peças...) ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    #[schema(ignore)]
    pub account_id: Uuid,
    pub vehicle_id: Option<Uuid>,
    pub technician_id: Option<Uuid>,
    #[schema(example = "Abastecimento")]
    pub description: String,
    #[schema(example = "fuel")]
    pub category: String,
    #[schema(example = "250.00")]
    pub amount: Decimal,
    #[schema(value_type = String, format = Date)]
    pub spent_on: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub vehicle_id: Option<Uuid>,
    pub technician_id: Option<Uuid>,
    #[validate(length(min = 1, message = "required"))]
    pub description: String,
    #[validate(length(min = 1, message = "required"))]
    pub category: String,
    pub amount: Decimal,
    #[schema(value_type = String, format = Date)]
    pub spent_on: NaiveDate,
}
