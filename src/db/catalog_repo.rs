// src/db/catalog_repo.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        scoped_repo::{ScopedRepository, TenantOwned},
        scoped_search::SearchSpec,
    },
    models::catalog::{CatalogService, NewCatalogService, NewProduct, Product},
};

pub type CatalogServiceRepository = ScopedRepository<CatalogService>;
pub type ProductRepository = ScopedRepository<Product>;

impl TenantOwned for CatalogService {
    type Listing = CatalogService;
    const LABEL: &'static str = "Serviço";
    const SEARCH: SearchSpec = SearchSpec {
        table: "services",
        alias: "s",
        join: None,
        text_columns: &["s.name", "s.description"],
        status_column: None,
        category_column: Some("s.category"),
        date_column: None,
        order_by: "s.created_at DESC",
        default_limit: 10,
    };
}

impl TenantOwned for Product {
    type Listing = Product;
    const LABEL: &'static str = "Produto";
    const SEARCH: SearchSpec = SearchSpec {
        table: "products",
        alias: "p",
        join: None,
        text_columns: &["p.name", "p.sku"],
        status_column: None,
        category_column: Some("p.category"),
        date_column: None,
        order_by: "p.created_at DESC",
        default_limit: 10,
    };
}

impl CatalogServiceRepository {
    pub async fn create(
        &self,
        account_id: Uuid,
        payload: &NewCatalogService,
    ) -> Result<CatalogService, AppError> {
        let service = sqlx::query_as::<_, CatalogService>(
            r#"
            INSERT INTO services (account_id, name, description, category, price, duration_minutes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(account_id)
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(&payload.category)
        .bind(payload.price)
        .bind(payload.duration_minutes)
        .fetch_one(&self.pool)
        .await?;

        Ok(service)
    }
}

impl ProductRepository {
    pub async fn create(&self, account_id: Uuid, payload: &NewProduct) -> Result<Product, AppError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (account_id, name, sku, category, price, stock_quantity)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(account_id)
        .bind(&payload.name)
        .bind(&payload.sku)
        .bind(&payload.category)
        .bind(payload.price)
        .bind(payload.stock_quantity)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }
}
