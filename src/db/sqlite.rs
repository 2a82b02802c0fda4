use std::time::Duration;

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

/// Creates a SQLite connection pool and applies pending migrations
///
/// Each request borrows its own connection from the pool, so no cursor or
/// session state is shared across requests.
pub async fn create_pool(database_url: &str) -> anyhow::Result<SqlitePool> {
    create_pool_with_connections(database_url, 5).await
}

/// Same as [`create_pool`] with an explicit connection limit
///
/// In-memory databases (`sqlite::memory:`) are private to a connection, so
/// callers using them should pass `1`.
pub async fn create_pool_with_connections(
    database_url: &str,
    max_connections: u32,
) -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!(max_connections, "Database pool ready");

    Ok(pool)
}
