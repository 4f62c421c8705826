mod auth;
mod catalog;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod recommendations;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::SupabaseIdentity;
use crate::catalog::PgCatalog;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration is read once here and handed to everything else
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting recommender API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (skills + course catalog reads)
    let db = create_pool(&config.database_url, config.db_max_connections).await?;

    // Initialize identity client
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;
    let identity = SupabaseIdentity::new(
        http,
        &config.supabase_url,
        config.supabase_service_key.clone(),
    );
    info!("Identity client initialized ({})", config.supabase_url);

    // Initialize LLM client
    let llm = LlmClient::new(&config)?;
    info!(
        "LLM client initialized (model: {}, max_retries: {})",
        llm.model(),
        config.completion_max_retries
    );

    let port = config.port;
    let state = AppState {
        config: Arc::new(config),
        identity: Arc::new(identity),
        catalog: Arc::new(PgCatalog::new(db)),
        completion: Arc::new(llm),
    };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
