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
pub struct ChatRequest {
    pub user_id: Option<i64>,
    pub message: Option<String>,
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Handler for natural-language queries to the assistant
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    ApiJson(request): ApiJson<ChatRequest>,
) -> AppResult<Json<Success<ChatResponse>>> {
    let message = request
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("The user's message is missing".to_string()))?;

    // Resolve the session before spending a completion call on it
    let session = match request.session_id {
        Some(id) => Some(state.sessions.get(id).await?),
        None => None,
    };
    let user_id = request
        .user_id
        .filter(|id| *id != 0)
        .or_else(|| session.as_ref().map(|s| s.user_id));

    tracing::info!(
        request_id = %request_id,
        user_id = ?user_id,
        session_id = ?request.session_id,
        "Processing chat request"
    );

    let response = state.assistant.respond(user_id, &message).await?;

    if let Some(session) = session {
        state
            .sessions
            .record_exchange(session.id, &message, &response)
            .await?;
    }

    Ok(Success::new(ChatResponse { response }))
}
