mod api_client;
mod config;
mod errors;
mod export;
mod jobs;
mod layout;
mod models;
mod onboarding;
mod routes;
mod state;
mod wizard;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; only malformed values fail here
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting assistant v{}", env!("CARGO_PKG_VERSION"));
    info!("Upstream job API: {}", config.api_base_url);
    info!(
        "Resume enhancement delay: {}ms",
        config.enhancement_delay_ms
    );

    // Build app state (upstream client, session store, tracker, rasterizer)
    let state = AppState::from_config(config.clone())?;

    // Expire wizard sessions whose client went away without closing them
    state
        .sessions
        .spawn_idle_sweeper(config.session_idle_ttl(), config.session_sweep_interval());
    info!("Wizard session idle TTL: {}s", config.session_idle_ttl_secs);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the front-end host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
