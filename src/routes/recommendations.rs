use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::RecommendationBuckets,
    routes::{
        extract::{lenient_user_id, ApiQuery},
        AppState, Success,
    },
};

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    #[serde(default, deserialize_with = "lenient_user_id")]
    pub user_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub recommendations: String,
}

#[derive(Debug, Serialize)]
pub struct BucketsResponse {
    pub buckets: RecommendationBuckets,
}

/// Free-text recommendations rendered by the assistant
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    ApiQuery(params): ApiQuery<RecommendationQuery>,
) -> AppResult<Json<Success<RecommendationResponse>>> {
    tracing::info!(request_id = %request_id, user_id = ?params.user_id, "Generating recommendations");

    let recommendations = state.assistant.recommend(params.user_id).await?;

    Ok(Success::new(RecommendationResponse { recommendations }))
}

/// Raw classifier output, without the completion service
pub async fn buckets(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    ApiQuery(params): ApiQuery<RecommendationQuery>,
) -> AppResult<Json<Success<BucketsResponse>>> {
    let buckets = state.assistant.recommendation_buckets(params.user_id).await?;

    tracing::info!(
        request_id = %request_id,
        user_id = ?params.user_id,
        highly_recommended = buckets.highly_recommended().len(),
        recommended = buckets.recommended().len(),
        not_recommended = buckets.not_recommended().len(),
        "Classified catalog"
    );

    Ok(Success::new(BucketsResponse { buckets }))
}
