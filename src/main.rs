use std::sync::Arc;

use makers_assistant::{
    config::Config,
    db::{self, SqliteStore},
    routes::{create_router, AppState},
    services::{
        completion::{CompletionConfig, DeepSeekClient},
        Assistant, Classifier, SessionStore,
    },
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("makers_assistant=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = db::create_pool(&config.database_url).await?;
    let store = Arc::new(SqliteStore::new(pool));

    // Built once and shared by every request
    let completion = Arc::new(DeepSeekClient::new(CompletionConfig::from(&config))?);

    let assistant = Assistant::new(
        store.clone(),
        store.clone(),
        completion,
        Classifier::new(config.match_policy),
    );

    let state = Arc::new(AppState {
        assistant: Arc::new(assistant),
        catalog: store,
        sessions: SessionStore::with_ttl(chrono::Duration::seconds(
            config.session_ttl_secs.try_into()?,
        )),
        low_stock_threshold: config.low_stock_threshold,
    });

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        match_policy = ?config.match_policy,
        "Server running"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
