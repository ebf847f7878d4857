//! switchboard - MCP (Model Context Protocol) server library
//!
//! A small implementation of the MCP 2025-06-18 tool surface for servers
//! that front a remote API on behalf of an agent.
//!
//! # Features
//!
//! - **Handler**: implement [`Handler`] to list and execute tools
//! - **Credentials**: every request carries the caller's [`Credential`],
//!   extracted by the transport before any protocol work happens
//! - **Transports**: Streamable HTTP (axum) and newline-delimited stdio
//!
//! # Example
//!
//! ```rust,ignore
//! use switchboard::{CallToolResult, ErrorData, Handler, Implementation, Tool, ToolContext};
//! use async_trait::async_trait;
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl Handler for Echo {
//!     fn tools(&self) -> Vec<Tool> {
//!         vec![Tool::new("echo", "Echo the arguments back")]
//!     }
//!
//!     async fn call_tool(&self, _name: &str, args: serde_json::Value, _ctx: ToolContext)
//!         -> Result<CallToolResult, ErrorData>
//!     {
//!         Ok(CallToolResult::text(args.to_string()))
//!     }
//!
//!     fn server_info(&self) -> Implementation {
//!         Implementation::new("echo", "0.1.0")
//!     }
//! }
//!
//! let state = std::sync::Arc::new(switchboard::McpState::new(Echo, switchboard::AuthPolicy::per_request()));
//! let router = switchboard::streamable_router(state);
//! ```

pub mod auth;
pub mod protocol;
pub mod session;
pub mod transport;
pub mod types;

// Re-export commonly used types at crate root
pub use types::content::Content;
pub use types::error::ErrorData;
pub use types::jsonrpc::{JsonRpcMessage, RequestId};
pub use types::protocol::{Implementation, ServerCapabilities};
pub use types::tool::{CallToolResult, Tool, ToolAnnotations, ToolSchema};

pub use auth::{AuthError, AuthPolicy, Credential};
pub use protocol::{Handler, ToolContext};
pub use session::{spawn_cleanup_task, InMemorySessionStore, Session, SessionStats, SessionStore};
pub use transport::{serve_lines, serve_stdio, streamable_router, McpState, StdioError};
