use std::sync::Arc;

use crate::{
    db::{CatalogSource, HistorySource},
    error::AppResult,
    models::{Bucket, HistoryTokens, Product, RecommendationBuckets},
    services::{
        classifier::Classifier,
        completion::{CompletionClient, CompletionRequest},
    },
};

const GENERAL_RECOMMENDATIONS_QUERY: &str = "Generate general recommendations for users.";
const PERSONAL_RECOMMENDATIONS_QUERY: &str =
    "Generate personalized recommendations based on my history.";

/// Store assistant that answers natural-language queries
///
/// Every call re-reads the catalog and the user's history, classifies the
/// catalog, embeds both in a prompt and forwards it to the completion client.
/// Construct once per process and share behind an `Arc`.
pub struct Assistant {
    catalog: Arc<dyn CatalogSource>,
    history: Arc<dyn HistorySource>,
    completion: Arc<dyn CompletionClient>,
    classifier: Classifier,
}

impl Assistant {
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        history: Arc<dyn HistorySource>,
        completion: Arc<dyn CompletionClient>,
        classifier: Classifier,
    ) -> Self {
        Self {
            catalog,
            history,
            completion,
            classifier,
        }
    }

    /// Classifies the in-stock catalog against a user's history
    ///
    /// Anonymous and unknown users get an empty token set.
    pub async fn recommendation_buckets(
        &self,
        user_id: Option<i64>,
    ) -> AppResult<RecommendationBuckets> {
        let products = self.catalog.fetch_in_stock_products().await?;
        let tokens = self.history_tokens(user_id).await?;
        Ok(self.classifier.classify(&products, &tokens)?)
    }

    /// Answers a free-text query, grounded in the catalog and the user's buckets
    pub async fn respond(&self, user_id: Option<i64>, message: &str) -> AppResult<String> {
        let products = self.catalog.fetch_in_stock_products().await?;
        let tokens = self.history_tokens(user_id).await?;
        let buckets = self.classifier.classify(&products, &tokens)?;

        let request = CompletionRequest {
            system_prompt: build_prompt(user_id, &products, &buckets, message),
            user_message: message.to_string(),
        };

        tracing::info!(
            provider = self.completion.name(),
            user_id = ?user_id,
            products = products.len(),
            classified = buckets.len(),
            "Requesting completion"
        );

        self.completion.complete(&request).await
    }

    /// Free-text recommendations for a user, or general ones when anonymous
    pub async fn recommend(&self, user_id: Option<i64>) -> AppResult<String> {
        let query = match user_id {
            Some(_) => PERSONAL_RECOMMENDATIONS_QUERY,
            None => GENERAL_RECOMMENDATIONS_QUERY,
        };
        self.respond(user_id, query).await
    }

    async fn history_tokens(&self, user_id: Option<i64>) -> AppResult<HistoryTokens> {
        let Some(user_id) = user_id else {
            return Ok(HistoryTokens::default());
        };

        let raw = self.history.fetch_history(user_id).await?;
        if raw.is_none() {
            tracing::debug!(user_id, "Unknown user, classifying without history");
        }
        Ok(HistoryTokens::parse(raw.as_deref()))
    }
}

/// Renders the system prompt sent to the completion service
pub fn build_prompt(
    user_id: Option<i64>,
    products: &[Product],
    buckets: &RecommendationBuckets,
    query: &str,
) -> String {
    let user_context = match user_id {
        Some(id) => format!("User ID: {}", id),
        None => "Unidentified user".to_string(),
    };

    let catalog = products
        .iter()
        .map(Product::to_string)
        .collect::<Vec<_>>()
        .join("\n");

    let classification = Bucket::ALL
        .iter()
        .map(|bucket| {
            let entries = buckets.get(*bucket);
            let names = if entries.is_empty() {
                "(none)".to_string()
            } else {
                entries.join(", ")
            };
            format!("{}: {}", bucket.label(), names)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an intelligent assistant for Makers Tech. Products are classified into the following categories:\n\
         - Highly Recommended: Matches the user's history brands or categories.\n\
         - Recommended: Indirect or complementary relationship.\n\
         - Not Recommended: No relevant connection.\n\n\
         {}\n\n\
         Current inventory:\n{}\n\n\
         Classification for this user:\n{}\n\n\
         User's query:\n{}\n",
        user_context, catalog, classification, query
    )
}
