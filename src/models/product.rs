use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A catalog entry as read from the store
///
/// Products are read-only snapshots; the inventory process that owns the
/// `products` table is the only writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub category: String,
    pub brand: String,
    pub price: Decimal,
    pub stock: i64,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        brand: impl Into<String>,
        price: Decimal,
        stock: i64,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            brand: brand.into(),
            price,
            stock,
        }
    }

    /// Whether at least one unit is available for sale
    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Single-line rendering used when the catalog is embedded in a prompt
impl Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} - {}): Price ${}, Stock: {}",
            self.name, self.category, self.brand, self.price, self.stock
        )
    }
}

/// Aggregate stock figures for the admin dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySummary {
    /// Sum of stock across every product
    pub total_units: i64,
    pub product_count: usize,
    /// Products with stock below the configured threshold (out-of-stock included)
    pub low_stock_items: usize,
    pub out_of_stock_items: usize,
    /// Number of distinct categories
    pub total_categories: usize,
}
