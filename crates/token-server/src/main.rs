//! token-advisor HTTP Server
//!
//! Axum-based REST API over the token report pipeline.

mod config;
mod handlers;
mod routes;
mod state;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    // Initialize market data client
    let market = config.market.client()?;
    if market.health_check().await {
        tracing::info!("✓ Connected to {}", market.name());
    } else {
        tracing::warn!("⚠ {} not reachable - reports will fall back to suggestions", market.name());
    }

    let app = routes::router(AppState::new(market));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 token-advisor server running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health          - Health check");
    tracing::info!("  POST /api/report      - Token report for {{identifier, investment_usd}}");
    tracing::info!("  GET  /api/suggest?q=  - Similar coin identifiers");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
