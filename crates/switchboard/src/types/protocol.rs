//! MCP Protocol Types
//!
//! Initialization handshake and capability negotiation.
//! Per MCP 2025-06-18 schema lines 800-884 and 2077-2137.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The newest MCP protocol version this library speaks.
pub const PROTOCOL_VERSION: &str = "2025-06-18";

/// Older revisions that are wire-compatible for a tools-only server.
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2025-06-18", "2025-03-26", "2024-11-05"];

/// Pick the protocol version to answer an `initialize` with.
///
/// Echo the client's version when we support it, otherwise offer ours and
/// let the client decide whether to disconnect.
pub fn negotiate_version(requested: &str) -> &'static str {
    SUPPORTED_PROTOCOL_VERSIONS
        .iter()
        .copied()
        .find(|v| *v == requested)
        .unwrap_or(PROTOCOL_VERSION)
}

/// Server or client implementation info.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Implementation {
    /// Programmatic name of the implementation.
    pub name: String,

    /// Version string.
    pub version: String,

    /// Human-readable title (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Implementation {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            title: None,
        }
    }
}

/// Initialize request params from client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Protocol version the client supports.
    pub protocol_version: String,

    /// Client capabilities. Kept opaque: a tools-only server never calls back
    /// into the client.
    #[serde(default)]
    pub capabilities: Value,

    /// Client implementation info.
    pub client_info: Implementation,
}

/// Initialize result from server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: Implementation,

    /// Optional instructions for the LLM.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl InitializeResult {
    pub fn new(
        protocol_version: impl Into<String>,
        server_info: Implementation,
        capabilities: ServerCapabilities,
    ) -> Self {
        Self {
            protocol_version: protocol_version.into(),
            capabilities,
            server_info,
            instructions: None,
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }
}

/// Server capabilities. Only `tools` is ever advertised.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
}

impl ServerCapabilities {
    /// Capabilities with tools enabled.
    pub fn with_tools() -> Self {
        Self {
            tools: Some(ToolsCapability::default()),
        }
    }
}

/// Tools capability.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    /// The tool list is fixed at start-up, so this is always `false`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negotiate_version() {
        assert_eq!(negotiate_version("2025-03-26"), "2025-03-26");
        assert_eq!(negotiate_version("1999-01-01"), PROTOCOL_VERSION);
    }

    #[test]
    fn test_initialize_result() {
        let result = InitializeResult::new(
            PROTOCOL_VERSION,
            Implementation::new("switchboard", "0.1.0"),
            ServerCapabilities::with_tools(),
        )
        .with_instructions("Call find_chats first.");

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(json["serverInfo"]["name"], "switchboard");
        assert!(json["capabilities"]["tools"].is_object());
        assert_eq!(json["instructions"], "Call find_chats first.");
    }

    #[test]
    fn test_initialize_params_without_capabilities() {
        let params: InitializeParams = serde_json::from_str(
            r#"{"protocolVersion":"2025-06-18","clientInfo":{"name":"agent","version":"1.0"}}"#,
        )
        .unwrap();

        assert_eq!(params.client_info.name, "agent");
        assert!(params.capabilities.is_null());
    }
}
