use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::services::classifier::ClassifyError;

/// Message returned to clients when the store cannot be read
pub const STORAGE_UNAVAILABLE_MESSAGE: &str = "Storage is unavailable";

/// Message returned to clients when classification rejects stored data
pub const RECOMMENDATION_FAILED_MESSAGE: &str = "Recommendation failed";

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] sqlx::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Classifier input comes from the store, so a contract violation is a
/// server fault; the detail stays in the logs.
impl From<ClassifyError> for AppError {
    fn from(error: ClassifyError) -> Self {
        tracing::error!(error = %error, "Classification rejected catalog data");
        AppError::Internal(RECOMMENDATION_FAILED_MESSAGE.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl AppError {
    /// HTTP status and client-facing message for this error
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::StorageUnavailable(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                STORAGE_UNAVAILABLE_MESSAGE.to_string(),
            ),
            AppError::ExternalService(_) | AppError::HttpClient(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error generating the response: {}", self),
            ),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "status": "error",
            "message": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
