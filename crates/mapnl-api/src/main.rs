//! mapnl API server.
//!
//! Interprets natural-language map commands into renderer actions over
//! HTTP, using the configured LLM provider with a rule-cascade fallback.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use mapnl_api::config::ApiConfig;
use mapnl_api::routes;
use mapnl_api::state::AppState;
use mapnl_llm::ProviderManager;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "mapnl-api starting");

    // ── Load config ─────────────────────────────────────────────
    let config_path = ApiConfig::path_from_env();
    let config = ApiConfig::load(&config_path)?;
    tracing::info!(
        path = %config_path,
        provider = %config.llm.provider,
        fallback_to_rules = config.llm.fallback_to_rules,
        "config loaded"
    );

    // ── Providers ───────────────────────────────────────────────
    let manager = Arc::new(ProviderManager::from_config(&config.llm)?);
    let state = AppState::new(manager);

    let app = routes::build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
