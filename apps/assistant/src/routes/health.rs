use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::warn;

use crate::state::AppState;

/// GET /health
/// Service status plus reachability of the upstream job API. Always 200; an
/// unreachable upstream is reported as "degraded".
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let upstream = match state.api.health_check().await {
        Ok(_) => "ok",
        Err(e) => {
            warn!("Upstream health check failed: {e}");
            "unreachable"
        }
    };

    Json(json!({
        "status": if upstream == "ok" { "ok" } else { "degraded" },
        "version": env!("CARGO_PKG_VERSION"),
        "service": "assistant",
        "upstream": upstream,
        "upstream_url": state.config.api_base_url,
        "open_sessions": state.sessions.len().await,
    }))
}
