use async_trait::async_trait;
use rust_decimal::{prelude::FromPrimitive, Decimal};
use sqlx::SqlitePool;

use crate::{
    error::{AppError, AppResult},
    models::Product,
};

/// Read access to the product catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Products with `stock > 0`, in storage order
    async fn fetch_in_stock_products(&self) -> AppResult<Vec<Product>>;

    /// Every product regardless of stock, in storage order
    async fn fetch_catalog(&self) -> AppResult<Vec<Product>>;
}

/// Read access to users' purchase histories
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Raw purchase history for `user_id`
    ///
    /// `None` means the user does not exist. A known user without a recorded
    /// history yields an empty string.
    async fn fetch_history(&self, user_id: i64) -> AppResult<Option<String>>;
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    name: String,
    category: String,
    brand: String,
    price: f64,
    stock: i64,
}

impl TryFrom<ProductRow> for Product {
    type Error = AppError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Decimal::from_f64(row.price)
            .map(|price| price.round_dp(2))
            .ok_or_else(|| {
                AppError::StorageUnavailable(sqlx::Error::Decode(
                    format!("price {} of product '{}' is not a decimal", row.price, row.name)
                        .into(),
                ))
            })?;

        Ok(Product {
            name: row.name,
            category: row.category,
            brand: row.brand,
            price,
            stock: row.stock,
        })
    }
}

/// Catalog and history accessors backed by the SQLite store
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn fetch_products(&self, sql: &str) -> AppResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Catalog read failed");
                e
            })?;

        rows.into_iter().map(Product::try_from).collect()
    }
}

#[async_trait]
impl CatalogSource for SqliteStore {
    async fn fetch_in_stock_products(&self) -> AppResult<Vec<Product>> {
        self.fetch_products(
            r#"
            SELECT name, category, brand, price, stock
            FROM products
            WHERE stock > 0
            ORDER BY product_id
            "#,
        )
        .await
    }

    async fn fetch_catalog(&self) -> AppResult<Vec<Product>> {
        self.fetch_products(
            r#"
            SELECT name, category, brand, price, stock
            FROM products
            ORDER BY product_id
            "#,
        )
        .await
    }
}

#[async_trait]
impl HistorySource for SqliteStore {
    async fn fetch_history(&self, user_id: i64) -> AppResult<Option<String>> {
        let row: Option<(Option<String>,)> =
            sqlx::query_as("SELECT purchase_history FROM users WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, user_id, "History read failed");
                    e
                })?;

        Ok(row.map(|(history,)| history.unwrap_or_default()))
    }
}
