//! v0-mcp - the v0 Platform API as MCP tools
//!
//! A tool call flows through one generic path:
//!
//! 1. [`registry`] looks the tool up by name
//! 2. [`validate`] decodes the raw arguments against its [`schema`]
//! 3. [`adapter`] reshapes them into one [`platform`] call made with the
//!    caller's credential
//! 4. [`format`] turns whatever happened into a tool result
//!
//! [`dispatch::Dispatcher`] runs those steps; [`handler::V0Handler`] exposes
//! it through switchboard's MCP transports.

pub mod adapter;
pub mod dispatch;
pub mod format;
pub mod handler;
pub mod platform;
pub mod registry;
pub mod schema;
pub mod telemetry;
pub mod tools;
pub mod validate;
pub mod web;

use std::sync::Arc;

pub use dispatch::Dispatcher;
pub use handler::V0Handler;
pub use platform::{HttpPlatform, Platform, PlatformCall, UpstreamError};
pub use registry::{Registry, RegistryError, ToolDescriptor};

/// A handler serving every tool against `platform`.
pub fn build_handler(platform: Arc<dyn Platform>) -> Result<V0Handler, RegistryError> {
    let registry = Arc::new(tools::registry()?);
    Ok(V0Handler::new(Dispatcher::new(registry, platform)))
}
