// src/models/team.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "technician_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TechnicianStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Technician {
    pub id: Uuid,
    #[schema(ignore)]
    pub account_id: Uuid,
    #[schema(example = "João Pereira")]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[schema(example = "Refrigeração")]
    pub specialty: Option<String>,
    pub status: TechnicianStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewTechnician {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub specialty: Option<String>,
}

/// Técnico resumido para junções.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TechnicianRef {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
}

impl TechnicianRef {
    pub fn from_joined(row: &PgRow) -> Result<Option<Self>, sqlx::Error> {
        let id: Option<Uuid> = row.try_get("technician_ref_id")?;
        match id {
            Some(id) => Ok(Some(Self {
                id,
                name: row.try_get("technician_ref_name")?,
                email: row.try_get("technician_ref_email")?,
            })),
            None => Ok(None),
        }
    }
}
