//! MCP Transports
//!
//! ## Streamable HTTP
//! - POST / - Send JSON-RPC message, receive the response directly
//! - DELETE / - Terminate session
//! - Session ID via Mcp-Session-Id header
//!
//! ## stdio
//! - Newline-delimited JSON-RPC on stdin/stdout, one process per client
//!
//! Both transports resolve the caller's credential before touching the
//! protocol layer. A request without one never reaches the handler.

mod stdio;
mod streamable;

pub use stdio::{serve_lines, serve_stdio, StdioError};
pub use streamable::{delete_handler, streamable_handler, SESSION_HEADER};

use axum::Router;
use serde_json::Value;
use std::sync::Arc;

use crate::auth::{AuthPolicy, Credential};
use crate::session::{InMemorySessionStore, SessionStore};
use crate::types::error::ErrorData;
use crate::types::jsonrpc::{response_json, JsonRpcMessage};
use crate::Handler;

/// Shared state for MCP transports.
pub struct McpState<H> {
    /// The application's tool handler.
    pub handler: Arc<H>,

    /// Session store.
    pub sessions: Arc<dyn SessionStore>,

    /// How each request's credential is resolved.
    pub auth: AuthPolicy,
}

impl<H> McpState<H> {
    /// Create state with an in-memory session store.
    pub fn new(handler: H, auth: AuthPolicy) -> Self {
        Self::with_session_store(handler, Arc::new(InMemorySessionStore::new()), auth)
    }

    /// Create state with a custom session store.
    pub fn with_session_store(handler: H, sessions: Arc<dyn SessionStore>, auth: AuthPolicy) -> Self {
        Self {
            handler: Arc::new(handler),
            sessions,
            auth,
        }
    }
}

/// Build an axum Router for the Streamable HTTP transport.
///
/// Routes:
/// - POST / - JSON-RPC request/response
/// - DELETE / - Session termination
pub fn streamable_router<H>(state: Arc<McpState<H>>) -> Router
where
    H: Handler + 'static,
{
    Router::new()
        .route(
            "/",
            axum::routing::post(streamable_handler::<H>).delete(delete_handler::<H>),
        )
        .with_state(state)
}

/// Process one decoded JSON body on behalf of an authenticated caller.
///
/// Returns the JSON-RPC response to send, or `None` for notifications.
pub(crate) async fn handle_body<H: Handler>(
    state: &McpState<H>,
    session_id: &str,
    credential: &Credential,
    body: Value,
) -> Option<Value> {
    // Echo whatever id the client sent, even if the rest fails to parse
    let raw_id = body.get("id").cloned().unwrap_or(Value::Null);

    if body.is_array() {
        return Some(response_json(
            raw_id,
            Err(ErrorData::invalid_request("JSON-RPC batches are not supported")),
        ));
    }

    let message: JsonRpcMessage = match serde_json::from_value(body) {
        Ok(m) => m,
        Err(e) => {
            return Some(response_json(
                raw_id,
                Err(ErrorData::invalid_request(format!("Invalid JSON-RPC: {}", e))),
            ));
        }
    };

    if message.is_notification() {
        match message.method.as_str() {
            "notifications/initialized" => {
                tracing::info!(session_id = %session_id, "Client initialized notification received");
            }
            "notifications/cancelled" => {
                tracing::info!(session_id = %session_id, "Request cancelled notification received");
            }
            other => {
                tracing::debug!(method = %other, "Unknown notification received");
            }
        }
        return None;
    }

    tracing::info!(
        method = %message.method,
        request_id = ?message.id,
        "Processing MCP request"
    );

    let outcome = crate::protocol::dispatch(
        state.handler.as_ref(),
        state.sessions.as_ref(),
        session_id,
        credential,
        &message,
    )
    .await;

    Some(response_json(raw_id, outcome))
}
