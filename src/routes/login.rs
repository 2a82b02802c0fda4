use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    routes::{extract::ApiJson, AppState, Success},
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub user_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub session_id: Uuid,
}

/// Simulated login: no credential check, opens a session for the user id
pub async fn login(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> AppResult<Json<Success<LoginResponse>>> {
    // Zero is not a valid id
    let user_id = request
        .user_id
        .filter(|id| *id != 0)
        .ok_or_else(|| AppError::InvalidInput("The 'user_id' parameter is missing".to_string()))?;

    let session = state.sessions.open(user_id).await;

    tracing::info!(request_id = %request_id, user_id, "User logged in");

    Ok(Success::new(LoginResponse {
        message: format!("User with ID {} successfully authenticated.", user_id),
        session_id: session.id,
    }))
}
