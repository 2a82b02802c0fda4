pub mod product;
pub mod recommendation;
pub mod session;

pub use product::{InventorySummary, Product};
pub use recommendation::{
    Bucket, HistoryTokens, RecommendationBuckets, BUCKET_CAPACITY, HISTORY_DELIMITER,
};
pub use session::{ChatMessage, ChatRole, Session};
