//! Config file discovery, loading, and environment variable overlay.
//!
//! Each file is read as a sparse layer: only keys it actually sets replace
//! what earlier layers produced.

use crate::{ConfigError, V0Config};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// Discover config files in standard locations.
///
/// Returns paths in load order (system, user, local). Only returns files that
/// exist.
pub fn discover_config_files() -> Vec<PathBuf> {
    discover_config_files_with_override(None)
}

/// Discover config files, optionally with a CLI override path.
///
/// If `cli_path` is provided it replaces the local override. A CLI path that
/// does not exist is still returned so loading reports it instead of quietly
/// running on defaults.
pub fn discover_config_files_with_override(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let system = PathBuf::from("/etc/v0-mcp/config.toml");
    if system.exists() {
        files.push(system);
    }

    // User config (XDG_CONFIG_HOME or ~/.config)
    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("v0-mcp/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    if let Some(path) = cli_path {
        files.push(path.to_path_buf());
        return files;
    }

    let local = PathBuf::from("v0-mcp.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// One file's worth of settings. Absent keys stay `None`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ConfigLayer {
    #[serde(default)]
    server: ServerLayer,
    #[serde(default)]
    upstream: UpstreamLayer,
    #[serde(default)]
    auth: AuthLayer,
    #[serde(default)]
    telemetry: TelemetryLayer,
}

#[derive(Debug, Default, Deserialize)]
struct ServerLayer {
    host: Option<String>,
    port: Option<u16>,
    path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct UpstreamLayer {
    base_url: Option<String>,
    timeout_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct AuthLayer {
    fallback_api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TelemetryLayer {
    otlp_endpoint: Option<String>,
    log_level: Option<String>,
}

/// Read and parse one TOML file.
pub(crate) fn load_from_file(path: &Path) -> Result<ConfigLayer, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_toml(&contents, path)
}

fn parse_toml(contents: &str, path: &Path) -> Result<ConfigLayer, ConfigError> {
    toml::from_str(contents).map_err(|e: toml::de::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Overlay one layer onto the running config.
pub(crate) fn merge_layer(config: &mut V0Config, layer: ConfigLayer) {
    if let Some(v) = layer.server.host {
        config.server.host = v;
    }
    if let Some(v) = layer.server.port {
        config.server.port = v;
    }
    if let Some(v) = layer.server.path {
        config.server.path = normalize_route(&v);
    }

    if let Some(v) = layer.upstream.base_url {
        config.upstream.base_url = v;
    }
    if let Some(v) = layer.upstream.timeout_ms {
        config.upstream.timeout_ms = Some(v);
    }

    if let Some(v) = layer.auth.fallback_api_key {
        config.auth.fallback_api_key = non_blank(v);
    }

    if let Some(v) = layer.telemetry.otlp_endpoint {
        config.telemetry.otlp_endpoint = non_blank(v);
    }
    if let Some(v) = layer.telemetry.log_level {
        config.telemetry.log_level = v;
    }
}

/// Apply environment variable overrides to config.
pub fn apply_env_overrides(config: &mut V0Config, sources: &mut ConfigSources) {
    apply_overrides_from(config, sources, |key| env::var(key).ok())
}

/// Apply overrides from any key/value lookup. `apply_env_overrides` passes
/// the process environment.
pub fn apply_overrides_from(
    config: &mut V0Config,
    sources: &mut ConfigSources,
    lookup: impl Fn(&str) -> Option<String>,
) {
    // Server
    if let Some(v) = lookup("V0MCP_HOST") {
        config.server.host = v;
        sources.env_overrides.push("V0MCP_HOST".to_string());
    }
    if let Some(v) = lookup("V0MCP_PORT") {
        if let Ok(port) = v.parse() {
            config.server.port = port;
            sources.env_overrides.push("V0MCP_PORT".to_string());
        }
    }
    if let Some(v) = lookup("V0MCP_PATH") {
        config.server.path = normalize_route(&v);
        sources.env_overrides.push("V0MCP_PATH".to_string());
    }

    // Upstream
    if let Some(v) = lookup("V0MCP_BASE_URL") {
        config.upstream.base_url = v;
        sources.env_overrides.push("V0MCP_BASE_URL".to_string());
    }
    if let Some(v) = lookup("V0MCP_TIMEOUT_MS") {
        if let Ok(ms) = v.parse() {
            config.upstream.timeout_ms = Some(ms);
            sources.env_overrides.push("V0MCP_TIMEOUT_MS".to_string());
        }
    }

    // Auth. V0_API_KEY is the name the platform's own tooling uses.
    if let Some(v) = lookup("V0_API_KEY") {
        if let Some(key) = non_blank(v) {
            config.auth.fallback_api_key = Some(key);
            sources.env_overrides.push("V0_API_KEY".to_string());
        }
    }

    // Telemetry
    if let Some(v) = lookup("V0MCP_OTLP_ENDPOINT") {
        config.telemetry.otlp_endpoint = non_blank(v);
        sources.env_overrides.push("V0MCP_OTLP_ENDPOINT".to_string());
    }
    // Also support standard OTEL env var
    if let Some(v) = lookup("OTEL_EXPORTER_OTLP_ENDPOINT") {
        config.telemetry.otlp_endpoint = non_blank(v);
        sources
            .env_overrides
            .push("OTEL_EXPORTER_OTLP_ENDPOINT".to_string());
    }
    if let Some(v) = lookup("V0MCP_LOG_LEVEL") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("V0MCP_LOG_LEVEL".to_string());
    }
    // Also support RUST_LOG
    if let Some(v) = lookup("RUST_LOG") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("RUST_LOG".to_string());
    }
}

/// Routes always start with a slash and never end with one.
pub(crate) fn normalize_route(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    format!("/{}", trimmed)
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
