//! Config sections. Every field has a compiled default so an empty file (or
//! no file at all) yields a runnable server.

use serde::{Deserialize, Serialize};

/// Where the MCP endpoint listens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    /// Default: 127.0.0.1
    #[serde(default = "ServerConfig::default_host")]
    pub host: String,

    /// HTTP port.
    /// Default: 8090
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,

    /// Route the Streamable HTTP transport is mounted on.
    /// Default: /mcp
    #[serde(default = "ServerConfig::default_path")]
    pub path: String,
}

impl ServerConfig {
    fn default_host() -> String {
        "127.0.0.1".to_string()
    }

    fn default_port() -> u16 {
        8090
    }

    fn default_path() -> String {
        "/mcp".to_string()
    }

    /// `host:port`, ready for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            path: Self::default_path(),
        }
    }
}

/// The v0 Platform API this server fronts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL every operation path is joined onto.
    /// Default: https://api.v0.dev/v1
    #[serde(default = "UpstreamConfig::default_base_url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds. Unset means no timeout beyond
    /// whatever the network stack imposes.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl UpstreamConfig {
    fn default_base_url() -> String {
        "https://api.v0.dev/v1".to_string()
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            timeout_ms: None,
        }
    }
}

/// Credential handling.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Process-wide API key used when a request carries none. Required for
    /// stdio mode; leave unset on shared HTTP deployments.
    #[serde(default)]
    pub fallback_api_key: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field(
                "fallback_api_key",
                &self.fallback_api_key.as_ref().map(|_| "***"),
            )
            .finish()
    }
}

/// Telemetry and observability configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// OTLP gRPC endpoint for OpenTelemetry. Unset disables export.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,

    /// Log filter directive (EnvFilter syntax).
    /// Default: info,v0_mcp=debug
    #[serde(default = "TelemetryConfig::default_log_level")]
    pub log_level: String,
}

impl TelemetryConfig {
    fn default_log_level() -> String {
        "info,v0_mcp=debug".to_string()
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            otlp_endpoint: None,
            log_level: Self::default_log_level(),
        }
    }
}
