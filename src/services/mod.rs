pub mod assistant;
pub mod classifier;
pub mod completion;
pub mod inventory;
pub mod sessions;

pub use assistant::Assistant;
pub use classifier::{classify, Classifier, MatchPolicy};
pub use sessions::SessionStore;
