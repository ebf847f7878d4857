//! Configuration loading for the v0 MCP server.
//!
//! # Usage
//!
//! ```rust,no_run
//! use v0conf::V0Config;
//!
//! let config = V0Config::load().expect("Failed to load config");
//!
//! println!("Listening on {}{}", config.server.bind_addr(), config.server.path);
//! println!("Platform: {}", config.upstream.base_url);
//! ```
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins):
//! 1. `/etc/v0-mcp/config.toml` (system)
//! 2. `~/.config/v0-mcp/config.toml` (user)
//! 3. `./v0-mcp.toml` (local override, replaced by `--config`)
//! 4. Environment variables (`V0MCP_*`, `V0_API_KEY`)
//!
//! # Example Config
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8090
//! path = "/mcp"
//!
//! [upstream]
//! base_url = "https://api.v0.dev/v1"
//! timeout_ms = 60000
//!
//! [auth]
//! # Single-tenant mode: used when a request carries no key
//! fallback_api_key = "v0_..."
//!
//! [telemetry]
//! otlp_endpoint = "http://127.0.0.1:4317"
//! log_level = "info,v0_mcp=debug"
//! ```

pub mod loader;
pub mod sections;

pub use loader::{discover_config_files_with_override, ConfigSources};
pub use sections::{AuthConfig, ServerConfig, TelemetryConfig, UpstreamConfig};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Complete server configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct V0Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl V0Config {
    /// Load configuration from all sources.
    pub fn load() -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(None)?;
        Ok(config)
    }

    /// Load configuration from a specific file path, then apply env overrides.
    ///
    /// If `config_path` is provided, it takes precedence over the local
    /// `./v0-mcp.toml` override. System and user configs still load first.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(config_path)?;
        Ok(config)
    }

    /// Load configuration from optional path and return information about sources.
    pub fn load_with_sources_from(
        config_path: Option<&Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        let files = loader::discover_config_files_with_override(config_path);
        let (mut config, mut sources) = Self::load_files(&files)?;
        loader::apply_env_overrides(&mut config, &mut sources);
        Ok((config, sources))
    }

    /// Layer the given files over compiled defaults, without consulting the
    /// environment.
    pub fn load_files(files: &[PathBuf]) -> Result<(Self, ConfigSources), ConfigError> {
        let mut sources = ConfigSources::default();
        let mut config = V0Config::default();

        for path in files {
            let layer = loader::load_from_file(path)?;
            loader::merge_layer(&mut config, layer);
            sources.files.push(path.clone());
        }

        Ok((config, sources))
    }

    /// Serialize config to TOML string. The fallback key is redacted.
    pub fn to_toml(&self) -> String {
        // Build TOML manually for nicer formatting
        let mut output = String::new();

        output.push_str("# v0-mcp Configuration\n\n");

        output.push_str("[server]\n");
        output.push_str(&format!("host = {}\n", quoted(&self.server.host)));
        output.push_str(&format!("port = {}\n", self.server.port));
        output.push_str(&format!("path = {}\n", quoted(&self.server.path)));

        output.push_str("\n[upstream]\n");
        output.push_str(&format!("base_url = {}\n", quoted(&self.upstream.base_url)));
        match self.upstream.timeout_ms {
            Some(ms) => output.push_str(&format!("timeout_ms = {}\n", ms)),
            None => output.push_str("# timeout_ms = 60000\n"),
        }

        output.push_str("\n[auth]\n");
        match self.auth.fallback_api_key {
            Some(_) => output.push_str("fallback_api_key = \"***\"\n"),
            None => output.push_str("# fallback_api_key = \"\"\n"),
        }

        output.push_str("\n[telemetry]\n");
        match &self.telemetry.otlp_endpoint {
            Some(endpoint) => output.push_str(&format!("otlp_endpoint = {}\n", quoted(endpoint))),
            None => output.push_str("# otlp_endpoint = \"http://127.0.0.1:4317\"\n"),
        }
        output.push_str(&format!("log_level = {}\n", quoted(&self.telemetry.log_level)));

        output
    }
}

/// A TOML basic string, escaped.
fn quoted(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}
