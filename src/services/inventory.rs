use std::collections::HashSet;

use crate::{
    db::CatalogSource,
    error::AppResult,
    models::{InventorySummary, Product},
};

/// Computes dashboard figures over the full catalog
///
/// `low_stock_threshold` is exclusive: a product with exactly that many units
/// is not low on stock. `stock <= 0` is out of stock, the same rule the
/// classifier uses to skip a product.
pub fn summarize(products: &[Product], low_stock_threshold: i64) -> InventorySummary {
    let categories: HashSet<&str> = products.iter().map(|p| p.category.as_str()).collect();

    InventorySummary {
        total_units: products.iter().map(|p| p.stock.max(0)).sum(),
        product_count: products.len(),
        low_stock_items: products
            .iter()
            .filter(|p| p.stock < low_stock_threshold)
            .count(),
        out_of_stock_items: products.iter().filter(|p| p.stock <= 0).count(),
        total_categories: categories.len(),
    }
}

/// Reads the catalog and summarizes it
pub async fn inventory_summary(
    catalog: &dyn CatalogSource,
    low_stock_threshold: i64,
) -> AppResult<InventorySummary> {
    let products = catalog.fetch_catalog().await?;
    Ok(summarize(&products, low_stock_threshold))
}
