// src/models/tenancy.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "account_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Pending,
    Active,
    Suspended,
}

// ---
// Account (o "Tenant")
// ---
// A empresa cliente da plataforma. Todo o resto pertence a exatamente uma conta.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    #[schema(example = "Refrigeração Polo Norte")]
    pub name: String,
    #[schema(example = "pro")]
    pub plan: String,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    #[validate(length(min = 2, message = "required"))]
    #[schema(example = "Refrigeração Polo Norte")]
    pub name: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "pro")]
    pub plan: Option<String>,

    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAccountStatus {
    pub status: AccountStatus,
}

/// Quantas linhas cada etapa da cascata removeu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurgedCollection {
    pub collection: String,
    pub deleted: u64,
}

/// Resposta da exclusão em cascata de uma conta.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountErasure {
    pub id: Uuid,
    pub name: String,
    pub message: String,
    pub purged: Vec<PurgedCollection>,
}
