//! Entitlement Webhook Server
//!
//! Axum-based server receiving Google Play purchase notifications and
//! reconciling them against the Supabase `profiles` table.

mod config;
mod handlers;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::handlers::{google_play_webhook, health_check};
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
    let addr = config.bind_addr.clone();

    let state = AppState::from_config(config);

    if state.processor.is_some() {
        tracing::info!("✓ Google Play and Supabase configured");
    } else {
        tracing::warn!("  Webhook deliveries will be rejected with 400 until configured");
        tracing::warn!("  Set GOOGLE_PLAY_SERVICE_ACCOUNT_KEY, GOOGLE_PLAY_PACKAGE_NAME,");
        tracing::warn!("  SUPABASE_URL and SUPABASE_SERVICE_ROLE_KEY in .env");
    }

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 entitlement-server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health               - Health check");
    tracing::info!("  POST /webhook/google-play  - Play purchase notifications");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/webhook/google-play", post(google_play_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
