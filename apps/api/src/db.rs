use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates the PostgreSQL pool backing the skill and course reads.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    info!("Connecting to PostgreSQL (max_connections={max_connections})...");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}
