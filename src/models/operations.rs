// src/models/operations.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::crm::CustomerRef;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "service_order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ServiceOrderStatus {
    Open,
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "quote_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Draft,
    Sent,
    Approved,
    Rejected,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "contract_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Active,
    Suspended,
    Expired,
    Cancelled,
}

// --- Ordem de Serviço ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrder {
    pub id: Uuid,
    #[schema(ignore)]
    pub account_id: Uuid,
    pub customer_id: Uuid,
    pub technician_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    #[schema(example = "Ar-condicionado da sala não gela")]
    pub description: String,
    pub status: ServiceOrderStatus,
    pub scheduled_for: Option<DateTime<Utc>>,
    #[schema(example = "350.00")]
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewServiceOrder {
    pub customer_id: Uuid,
    pub technician_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    #[validate(length(min = 1, message = "required"))]
    pub description: String,
    pub scheduled_for: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrderListing {
    #[serde(flatten)]
    pub order: ServiceOrder,
    pub customer: Option<CustomerRef>,
}

impl<'r> FromRow<'r, PgRow> for ServiceOrderListing {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            order: ServiceOrder::from_row(row)?,
            customer: CustomerRef::from_joined(row)?,
        })
    }
}

// --- Orçamento ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: Uuid,
    #[schema(ignore)]
    pub account_id: Uuid,
    pub customer_id: Uuid,
    pub service_id: Option<Uuid>,
    #[schema(example = "Instalação de 3 splits")]
    pub title: String,
    pub description: Option<String>,
    #[schema(example = "2100.00")]
    pub total_amount: Decimal,
    pub status: QuoteStatus,
    #[schema(value_type = Option<String>, format = Date)]
    pub valid_until: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewQuote {
    pub customer_id: Uuid,
    pub service_id: Option<Uuid>,
    #[validate(length(min = 1, message = "required"))]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub total_amount: Decimal,
    #[schema(value_type = Option<String>, format = Date)]
    pub valid_until: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteListing {
    #[serde(flatten)]
    pub quote: Quote,
    pub customer: Option<CustomerRef>,
}

impl<'r> FromRow<'r, PgRow> for QuoteListing {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            quote: Quote::from_row(row)?,
            customer: CustomerRef::from_joined(row)?,
        })
    }
}

// --- Contrato de manutenção ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: Uuid,
    #[schema(ignore)]
    pub account_id: Uuid,
    pub customer_id: Uuid,
    #[schema(example = "PMOC mensal - Matriz")]
    pub title: String,
    pub description: Option<String>,
    #[schema(example = "800.00")]
    pub monthly_value: Decimal,
    pub status: ContractStatus,
    #[schema(value_type = String, format = Date)]
    pub start_date: NaiveDate,
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewContract {
    pub customer_id: Uuid,
    #[validate(length(min = 1, message = "required"))]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub monthly_value: Decimal,
    #[schema(value_type = String, format = Date)]
    pub start_date: NaiveDate,
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractListing {
    #[serde(flatten)]
    pub contract: Contract,
    pub customer: Option<CustomerRef>,
}

impl<'r> FromRow<'r, PgRow> for ContractListing {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            contract: Contract::from_row(row)?,
            customer: CustomerRef::from_joined(row)?,
        })
    }
}
