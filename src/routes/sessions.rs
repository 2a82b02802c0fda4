use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::ChatMessage,
    routes::{extract::ApiPath, AppState, Success},
};

#[derive(Debug, Serialize)]
pub struct CloseResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<ChatMessage>,
}

/// Chat history recorded for a session
pub async fn messages(
    State(state): State<Arc<AppState>>,
    ApiPath(session_id): ApiPath<Uuid>,
) -> AppResult<Json<Success<MessagesResponse>>> {
    let messages = state.sessions.messages(session_id).await?;
    Ok(Success::new(MessagesResponse { messages }))
}

/// Logs out: the session id stops resolving
pub async fn close(
    State(state): State<Arc<AppState>>,
    ApiPath(session_id): ApiPath<Uuid>,
) -> AppResult<Json<Success<CloseResponse>>> {
    state.sessions.close(session_id).await?;
    Ok(Success::new(CloseResponse {
        message: format!("Session {} closed.", session_id),
    }))
}
