use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultOnResponse, TraceLayer},
    LatencyUnit,
};

use crate::{
    db::CatalogSource,
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::{Assistant, SessionStore},
};

pub mod chat;
pub mod extract;
pub mod inventory;
pub mod login;
pub mod recommendations;
pub mod sessions;

/// Value of the `status` field on every successful response
pub const SUCCESS: &str = "success";

/// Shared application state
///
/// Everything here is either read-only or internally synchronized; each
/// request reaches the store through its own pooled connection.
pub struct AppState {
    pub assistant: Arc<Assistant>,
    pub catalog: Arc<dyn CatalogSource>,
    pub sessions: SessionStore,
    pub low_stock_threshold: i64,
}

/// Generic success envelope: `{"status": "success", ...payload}`
#[derive(Debug, Serialize)]
pub struct Success<T: Serialize> {
    pub status: &'static str,
    #[serde(flatten)]
    pub payload: T,
}

impl<T: Serialize> Success<T> {
    pub fn new(payload: T) -> Json<Self> {
        Json(Self {
            status: SUCCESS,
            payload,
        })
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(make_span_with_request_id)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(tracing::Level::INFO)
                                .latency_unit(LatencyUnit::Millis),
                        ),
                )
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(login::login))
        .route("/chat", post(chat::chat))
        .route("/recommendations", get(recommendations::recommend))
        .route("/recommendations/buckets", get(recommendations::buckets))
        .route("/inventory", get(inventory::list))
        .route("/inventory/summary", get(inventory::summary))
        .route("/sessions/:session_id", delete(sessions::close))
        .route("/sessions/:session_id/messages", get(sessions::messages))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
