// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Serviço oferecido pela conta (tabela `services`).
// O nome `CatalogService` evita confusão com a camada de serviços.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogService {
    pub id: Uuid,
    #[schema(ignore)]
    pub account_id: Uuid,
    #[schema(example = "Instalação de split 12000 BTUs")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "instalacao")]
    pub category: Option<String>,
    #[schema(example = "450.00")]
    pub price: Decimal,
    #[schema(example = 120)]
    pub duration_minutes: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCatalogService {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub price: Decimal,
    #[validate(range(min = 1, message = "invalid_duration"))]
    pub duration_minutes: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[schema(ignore)]
    pub account_id: Uuid,
    #[schema(example = "Gás R410A 11kg")]
    pub name: String,
    #[schema(example = "GAS-R410A-11")]
    pub sku: Option<String>,
    pub category: Option<String>,
    #[schema(example = "890.00")]
    pub price: Decimal,
    #[schema(example = 4)]
    pub stock_quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    pub sku: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    #[validate(range(min = 0, message = "invalid_quantity"))]
    pub stock_quantity: i32,
}
