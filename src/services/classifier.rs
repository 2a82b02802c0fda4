//! Recommendation classifier
//!
//! Maps a purchase history onto three capped buckets of product names by
//! comparing history tokens against each product's brand and category.
//! Pure and synchronous: it performs no I/O and holds no shared state.

use serde::Deserialize;

use crate::models::{Bucket, HistoryTokens, Product, RecommendationBuckets};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Policy deciding which bucket a product falls into
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Brand or category in the history ⇒ highly recommended, otherwise not
    /// recommended. The recommended bucket stays empty.
    #[default]
    AnyField,
    /// Both fields matched ⇒ highly recommended, exactly one ⇒ recommended,
    /// neither ⇒ not recommended.
    Graded,
}

impl MatchPolicy {
    pub fn bucket_for(&self, product: &Product, tokens: &HistoryTokens) -> Bucket {
        let brand = tokens.contains(&product.brand);
        let category = tokens.contains(&product.category);

        match self {
            MatchPolicy::AnyField if brand || category => Bucket::HighlyRecommended,
            MatchPolicy::AnyField => Bucket::NotRecommended,
            MatchPolicy::Graded => match (brand, category) {
                (true, true) => Bucket::HighlyRecommended,
                (true, false) | (false, true) => Bucket::Recommended,
                (false, false) => Bucket::NotRecommended,
            },
        }
    }
}

/// Recommendation classifier bound to a [`MatchPolicy`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier {
    policy: MatchPolicy,
}

impl Classifier {
    pub fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Classifies `products` in catalog order, first seen first filled
    ///
    /// Products with `stock <= 0` are skipped even when the caller already
    /// filtered them. Scanning stops once every bucket is at capacity.
    /// A product without a name is rejected before any bucket is filled.
    pub fn classify(
        &self,
        products: &[Product],
        tokens: &HistoryTokens,
    ) -> Result<RecommendationBuckets, ClassifyError> {
        if let Some(position) = products.iter().position(|p| p.name.trim().is_empty()) {
            return Err(ClassifyError::InvalidArgument(format!(
                "product at position {} has a blank name",
                position
            )));
        }

        let mut buckets = RecommendationBuckets::default();

        for product in products {
            if buckets.is_full() {
                break;
            }
            if !product.is_in_stock() {
                continue;
            }

            let bucket = self.policy.bucket_for(product, tokens);
            buckets.offer(bucket, &product.name);
        }

        tracing::debug!(
            policy = ?self.policy,
            tokens = tokens.len(),
            highly_recommended = buckets.highly_recommended().len(),
            recommended = buckets.recommended().len(),
            not_recommended = buckets.not_recommended().len(),
            "Classified catalog"
        );

        Ok(buckets)
    }
}

/// Classifies with the default [`MatchPolicy::AnyField`] policy
pub fn classify(
    products: &[Product],
    tokens: &HistoryTokens,
) -> Result<RecommendationBuckets, ClassifyError> {
    Classifier::default().classify(products, tokens)
}
