// src/models/crm.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{postgres::PgRow, FromRow, Row};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::team::TechnicianRef;

// --- ENUMS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "follow_up_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FollowUpStatus {
    Pending,
    Done,
    Cancelled,
}

// --- CLIENTE ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    #[schema(ignore)]
    pub account_id: Uuid,

    // Técnico responsável pelo atendimento
    pub technician_id: Option<Uuid>,

    #[schema(example = "Maria da Silva")]
    pub name: String,
    #[schema(example = "maria@email.com")]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub document_number: Option<String>,

    // Endereço flexível: o frontend manda um JSON, guardamos como JSONB.
    pub address: Option<Value>,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Maria da Silva")]
    pub name: String,
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub document_number: Option<String>,
    pub technician_id: Option<Uuid>,
    pub address: Option<Value>,
    pub notes: Option<String>,
}

/// Cliente resumido, usado nas junções: só id, nome e e-mail.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRef {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
}

impl CustomerRef {
    /// Lê as colunas `customer_ref_*` projetadas pela junção (LEFT JOIN).
    pub fn from_joined(row: &PgRow) -> Result<Option<Self>, sqlx::Error> {
        let id: Option<Uuid> = row.try_get("customer_ref_id")?;
        match id {
            Some(id) => Ok(Some(Self {
                id,
                name: row.try_get("customer_ref_name")?,
                email: row.try_get("customer_ref_email")?,
            })),
            None => Ok(None),
        }
    }
}

/// Cliente + técnico responsável resumido.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerListing {
    #[serde(flatten)]
    pub customer: Customer,
    pub technician: Option<TechnicianRef>,
}

impl<'r> FromRow<'r, PgRow> for CustomerListing {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            customer: Customer::from_row(row)?,
            technician: TechnicianRef::from_joined(row)?,
        })
    }
}

// --- FOLLOW-UP (retorno agendado com o cliente) ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FollowUp {
    pub id: Uuid,
    #[schema(ignore)]
    pub account_id: Uuid,
    pub customer_id: Uuid,
    #[schema(example = "Ligar para confirmar a manutenção preventiva")]
    pub title: String,
    pub notes: Option<String>,
    pub status: FollowUpStatus,
    #[schema(value_type = String, format = Date, example = "2024-01-10")]
    pub start_date: NaiveDate,
    #[schema(value_type = Option<String>, format = Date)]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewFollowUp {
    pub customer_id: Uuid,
    #[validate(length(min = 1, message = "required"))]
    pub title: String,
    pub notes: Option<String>,
    #[schema(value_type = String, format = Date, example = "2024-01-10")]
    pub start_date: NaiveDate,
    #[schema(value_type = Option<String>, format = Date)]
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpListing {
    #[serde(flatten)]
    pub follow_up: FollowUp,
    pub customer: Option<CustomerRef>,
}

impl<'r> FromRow<'r, PgRow> for FollowUpListing {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            follow_up: FollowUp::from_row(row)?,
            customer: CustomerRef::from_joined(row)?,
        })
    }
}

// --- EVENTOS DA AGENDA ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    #[schema(ignore)]
    pub account_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub technician_id: Option<Uuid>,
    #[schema(example = "Visita técnica")]
    pub title: String,
    pub description: Option<String>,
    #[schema(example = "visit")]
    pub kind: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub customer_id: Option<Uuid>,
    pub technician_id: Option<Uuid>,
    #[validate(length(min = 1, message = "required"))]
    pub title: String,
    pub description: Option<String>,
    pub kind: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListing {
    #[serde(flatten)]
    pub event: Event,
    pub customer: Option<CustomerRef>,
}

impl<'r> FromRow<'r, PgRow> for EventListing {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            event: Event::from_row(row)?,
            customer: CustomerRef::from_joined(row)?,
        })
    }
}
