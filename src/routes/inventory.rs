use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{
    error::AppResult,
    models::{InventorySummary, Product},
    routes::{AppState, Success},
    services::inventory,
};

#[derive(Debug, Serialize)]
pub struct InventoryResponse {
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: InventorySummary,
}

/// Full catalog, out-of-stock products included
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Success<InventoryResponse>>> {
    let products = state.catalog.fetch_catalog().await?;
    Ok(Success::new(InventoryResponse { products }))
}

/// Dashboard stock figures
pub async fn summary(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Success<SummaryResponse>>> {
    let summary =
        inventory::inventory_summary(state.catalog.as_ref(), state.low_stock_threshold).await?;
    Ok(Success::new(SummaryResponse { summary }))
}
