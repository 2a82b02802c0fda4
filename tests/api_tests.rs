use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};
use sqlx::SqlitePool;

use makers_assistant::{
    db::{create_pool_with_connections, SqliteStore},
    error::{AppError, AppResult},
    routes::{create_router, AppState},
    services::{
        completion::{CompletionClient, CompletionRequest},
        Assistant, Classifier, MatchPolicy, SessionStore,
    },
};

/// Replies with the system prompt so tests can see what the assistant sent
struct EchoCompletion;

#[async_trait::async_trait]
impl CompletionClient for EchoCompletion {
    async fn complete(&self, request: &CompletionRequest) -> AppResult<String> {
        Ok(request.system_prompt.clone())
    }

    fn name(&self) -> &'static str {
        "echo"
    }
}

struct FailingCompletion;

#[async_trait::async_trait]
impl CompletionClient for FailingCompletion {
    async fn complete(&self, _request: &CompletionRequest) -> AppResult<String> {
        Err(AppError::ExternalService(
            "DeepSeek API returned status 503 Service Unavailable".to_string(),
        ))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

async fn create_test_server_with(
    completion: Arc<dyn CompletionClient>,
) -> (TestServer, SqlitePool) {
    let pool = create_pool_with_connections("sqlite::memory:", 1)
        .await
        .unwrap();
    let store = Arc::new(SqliteStore::new(pool.clone()));

    let assistant = Assistant::new(
        store.clone(),
        store.clone(),
        completion,
        Classifier::new(MatchPolicy::AnyField),
    );
    let state = Arc::new(AppState {
        assistant: Arc::new(assistant),
        catalog: store,
        sessions: SessionStore::new(),
        low_stock_threshold: 5,
    });

    (TestServer::new(create_router(state)).unwrap(), pool)
}

async fn create_test_server() -> (TestServer, SqlitePool) {
    create_test_server_with(Arc::new(EchoCompletion)).await
}

async fn insert_user(pool: &SqlitePool, user_id: i64, history: &str) {
    sqlx::query(
        "INSERT INTO users (user_id, name, email, purchase_history) VALUES (?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(format!("User {}", user_id))
    .bind(format!("user{}@example.com", user_id))
    .bind(history)
    .execute(pool)
    .await
    .unwrap();
}

#[tokio::test]
async fn test_health_check() {
    let (server, _) = create_test_server().await;
    let response = server.get("/health").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_request_id_echoed() {
    let (server, _) = create_test_server().await;
    let id = "6f1c2a1e-6a7b-4c3d-9e8f-0a1b2c3d4e5f";

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static(id),
        )
        .await;

    let echoed = response.header(HeaderName::from_static("x-request-id"));
    assert_eq!(echoed.to_str().unwrap(), id);
}

#[tokio::test]
async fn test_login_returns_session() {
    let (server, _) = create_test_server().await;

    let response = server.post("/api/login").json(&json!({ "user_id": 1 })).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "User with ID 1 successfully authenticated.");
    assert!(body["session_id"].is_string());
}

#[tokio::test]
async fn test_login_without_user_id_is_bad_request() {
    let (server, _) = create_test_server().await;

    let response = server.post("/api/login").json(&json!({})).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "The 'user_id' parameter is missing");
}

#[tokio::test]
async fn test_login_with_zero_user_id_is_bad_request() {
    let (server, _) = create_test_server().await;

    let response = server.post("/api/login").json(&json!({ "user_id": 0 })).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "The 'user_id' parameter is missing");
}

#[tokio::test]
async fn test_chat_without_message_is_bad_request() {
    let (server, _) = create_test_server().await;

    let response = server.post("/api/chat").json(&json!({ "user_id": 1 })).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_chat_embeds_catalog_and_buckets() {
    let (server, pool) = create_test_server().await;
    insert_user(&pool, 42, "Apple").await;

    let response = server
        .post("/api/chat")
        .json(&json!({ "user_id": 42, "message": "Which laptops do you have?" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "success");

    let prompt = body["response"].as_str().unwrap();
    assert!(prompt.contains("User ID: 42"));
    assert!(prompt.contains("Highly Recommended: MacBook Air, iPhone 14 Pro"));
    assert!(prompt.contains("Not Recommended: Dell Inspiron 15, HP Pavilion 14"));
    assert!(prompt.contains("Which laptops do you have?"));
}

#[tokio::test]
async fn test_chat_completion_failure_is_server_error() {
    let (server, _) = create_test_server_with(Arc::new(FailingCompletion)).await;

    let response = server
        .post("/api/chat")
        .json(&json!({ "message": "hello" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn test_chat_records_session_history() {
    let (server, pool) = create_test_server().await;
    insert_user(&pool, 42, "Apple").await;

    let login: Value = server
        .post("/api/login")
        .json(&json!({ "user_id": 42 }))
        .await
        .json();
    let session_id = login["session_id"].as_str().unwrap().to_string();

    let response = server
        .post("/api/chat")
        .json(&json!({ "session_id": session_id, "message": "Any phones?" }))
        .await;
    response.assert_status_ok();
    let reply: Value = response.json();
    // User id falls back to the session's
    assert!(reply["response"].as_str().unwrap().contains("User ID: 42"));

    let history: Value = server
        .get(&format!("/api/sessions/{}/messages", session_id))
        .await
        .json();
    let messages = history["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[0]["content"], "Any phones?");
    assert_eq!(messages[1]["role"], "assistant");
}

#[tokio::test]
async fn test_chat_unknown_session_is_not_found() {
    let (server, _) = create_test_server().await;

    let response = server
        .post("/api/chat")
        .json(&json!({
            "session_id": "00000000-0000-4000-8000-000000000000",
            "message": "hi"
        }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_recommendations_anonymous() {
    let (server, _) = create_test_server().await;

    let response = server.get("/api/recommendations").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "success");
    let text = body["recommendations"].as_str().unwrap();
    assert!(text.contains("Unidentified user"));
    assert!(text.contains("Generate general recommendations for users."));
}

#[tokio::test]
async fn test_recommendation_buckets_for_user() {
    let (server, pool) = create_test_server().await;
    insert_user(&pool, 42, "Apple").await;

    let response = server
        .get("/api/recommendations/buckets")
        .add_query_param("user_id", 42)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body["buckets"],
        json!({
            "highly_recommended": ["MacBook Air", "iPhone 14 Pro"],
            "recommended": [],
            "not_recommended": ["Dell Inspiron 15", "HP Pavilion 14"]
        })
    );
}

#[tokio::test]
async fn test_recommendation_buckets_skip_out_of_stock() {
    let (server, pool) = create_test_server().await;
    sqlx::query("UPDATE products SET stock = 0 WHERE name = 'Dell Inspiron 15'")
        .execute(&pool)
        .await
        .unwrap();

    let body: Value = server.get("/api/recommendations/buckets").await.json();

    assert_eq!(
        body["buckets"]["not_recommended"],
        json!(["MacBook Air", "HP Pavilion 14"])
    );
}

#[tokio::test]
async fn test_storage_failure_is_generic_server_error() {
    let (server, pool) = create_test_server().await;
    pool.close().await;

    let response = server.get("/api/recommendations/buckets").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["message"], "Storage is unavailable");
}

#[tokio::test]
async fn test_inventory_listing_and_summary() {
    let (server, pool) = create_test_server().await;
    sqlx::query("UPDATE products SET stock = 0 WHERE product_id = 3")
        .execute(&pool)
        .await
        .unwrap();

    let listing: Value = server.get("/api/inventory").await.json();
    assert_eq!(listing["products"].as_array().unwrap().len(), 10);

    let summary: Value = server.get("/api/inventory/summary").await.json();
    assert_eq!(summary["status"], "success");
    assert_eq!(summary["summary"]["product_count"], 10);
    assert_eq!(summary["summary"]["total_units"], 145);
    assert_eq!(summary["summary"]["out_of_stock_items"], 1);
    assert_eq!(summary["summary"]["low_stock_items"], 1);
    assert_eq!(summary["summary"]["total_categories"], 3);
}

#[tokio::test]
async fn test_chat_non_json_body_uses_error_envelope() {
    let (server, _) = create_test_server().await;

    let response = server.post("/api/chat").text("message=hi").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["status"], "error");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_chat_wrong_field_type_uses_error_envelope() {
    let (server, _) = create_test_server().await;

    let response = server.post("/api/chat").json(&json!({ "message": 5 })).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_recommendations_non_numeric_user_id_is_anonymous() {
    let (server, _) = create_test_server().await;

    let response = server
        .get("/api/recommendations")
        .add_query_param("user_id", "abc")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["recommendations"]
        .as_str()
        .unwrap()
        .contains("Unidentified user"));
}

#[tokio::test]
async fn test_malformed_session_id_uses_error_envelope() {
    let (server, _) = create_test_server().await;

    let response = server.get("/api/sessions/not-a-uuid/messages").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_blank_product_name_is_generic_server_error() {
    let (server, pool) = create_test_server().await;
    sqlx::query("UPDATE products SET name = '' WHERE product_id = 10")
        .execute(&pool)
        .await
        .unwrap();

    let buckets = server.get("/api/recommendations/buckets").await;
    buckets.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = buckets.json();
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Recommendation failed");

    let chat = server.post("/api/chat").json(&json!({ "message": "hi" })).await;
    chat.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let text = chat.text();
    assert!(text.contains("Recommendation failed"));
    assert!(!text.contains("position"));
}

#[tokio::test]
async fn test_logout_closes_session() {
    let (server, _) = create_test_server().await;

    let login: Value = server
        .post("/api/login")
        .json(&json!({ "user_id": 7 }))
        .await
        .json();
    let session_id = login["session_id"].as_str().unwrap().to_string();

    let logout = server.delete(&format!("/api/sessions/{}", session_id)).await;
    logout.assert_status_ok();
    let body: Value = logout.json();
    assert_eq!(body["status"], "success");

    server
        .get(&format!("/api/sessions/{}/messages", session_id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .post("/api/chat")
        .json(&json!({ "session_id": session_id, "message": "still there?" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .delete(&format!("/api/sessions/{}", session_id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_negative_stock_counts_as_out_of_stock() {
    let (server, pool) = create_test_server().await;
    sqlx::query("UPDATE products SET stock = -2 WHERE product_id = 3")
        .execute(&pool)
        .await
        .unwrap();

    let summary: Value = server.get("/api/inventory/summary").await.json();
    assert_eq!(summary["summary"]["out_of_stock_items"], 1);
    assert_eq!(summary["summary"]["total_units"], 145);
}
