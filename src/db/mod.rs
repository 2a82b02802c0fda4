pub mod sqlite;
pub mod store;

pub use sqlite::{create_pool, create_pool_with_connections};
pub use store::{CatalogSource, HistorySource, SqliteStore};
