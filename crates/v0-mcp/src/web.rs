//! HTTP surface: the MCP endpoint plus a health check.

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use switchboard::McpState;

use crate::handler::V0Handler;

/// Mount the MCP endpoint at `mcp_path` and `GET /health` beside it.
pub fn router(state: Arc<McpState<V0Handler>>, mcp_path: &str) -> Router {
    let health = Router::new()
        .route("/health", get(health_handler))
        .with_state(state.clone());

    let mcp = switchboard::streamable_router(state);
    let router = Router::new().merge(health);
    // axum refuses to nest at the root
    if mcp_path.trim_matches('/').is_empty() {
        router.merge(mcp)
    } else {
        router.nest(mcp_path, mcp)
    }
}

/// Unauthenticated; reports only counts.
async fn health_handler(State(state): State<Arc<McpState<V0Handler>>>) -> Json<Value> {
    let sessions = state.sessions.stats();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "tools": state.handler.dispatcher().registry().len(),
        "sessions": {
            "total": sessions.total,
            "initialized": sessions.initialized,
        },
    }))
}
