use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use switchboard::{AuthPolicy, Credential, McpState};
use tokio_util::sync::CancellationToken;
use v0_mcp::{build_handler, telemetry, web, HttpPlatform};
use v0conf::V0Config;

/// MCP server exposing the v0 Platform API as tools
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of ./v0-mcp.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Serve newline-delimited JSON-RPC on stdin/stdout instead of HTTP
    #[arg(long)]
    stdio: bool,

    /// OTLP gRPC endpoint, e.g. "127.0.0.1:4317" (overrides config)
    #[arg(long)]
    otlp_endpoint: Option<String>,

    /// Print the effective configuration and exit
    #[arg(long)]
    show_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, sources) = V0Config::load_with_sources_from(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(endpoint) = cli.otlp_endpoint {
        config.telemetry.otlp_endpoint = Some(endpoint);
    }

    if cli.show_config {
        for file in &sources.files {
            println!("# file: {}", file.display());
        }
        for var in &sources.env_overrides {
            println!("# env: {}", var);
        }
        print!("{}", config.to_toml());
        return Ok(());
    }

    telemetry::init(
        &config.telemetry.log_level,
        config.telemetry.otlp_endpoint.as_deref(),
        cli.stdio,
    )
    .context("Failed to initialize telemetry")?;

    for file in &sources.files {
        tracing::info!("Loaded config from {}", file.display());
    }

    let timeout = config.upstream.timeout_ms.map(Duration::from_millis);
    let platform = HttpPlatform::new(&config.upstream.base_url, timeout)
        .context("Failed to create platform client")?;
    tracing::info!("Platform API: {}", platform.base_url());

    let handler = build_handler(Arc::new(platform)).context("Failed to register tools")?;

    let fallback = config
        .auth
        .fallback_api_key
        .as_deref()
        .and_then(Credential::new);
    let auth = match fallback {
        Some(key) => {
            tracing::info!("Fallback API key configured; requests without one will use it");
            AuthPolicy::with_fallback(key)
        }
        None => AuthPolicy::per_request(),
    };

    if cli.stdio {
        if auth.fallback.is_none() {
            anyhow::bail!("--stdio needs an API key: set V0_API_KEY or auth.fallback_api_key");
        }
        let state = Arc::new(McpState::new(handler, auth));
        tracing::info!("Serving MCP on stdio");
        switchboard::serve_stdio(state)
            .await
            .context("stdio transport failed")?;
        return Ok(());
    }

    serve_http(config, handler, auth).await
}

async fn serve_http(config: V0Config, handler: v0_mcp::V0Handler, auth: AuthPolicy) -> Result<()> {
    let state = Arc::new(McpState::new(handler, auth));
    let shutdown_token = CancellationToken::new();

    let app = web::router(state.clone(), &config.server.path);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("v0-mcp listening on http://{}", addr);
    tracing::info!("   MCP Streamable HTTP: POST http://{}{}", addr, config.server.path);
    tracing::info!("   Health: GET http://{}/health", addr);

    switchboard::spawn_cleanup_task(
        state.sessions.clone(),
        Duration::from_secs(30),
        Duration::from_secs(1800),
        shutdown_token.clone(),
    );

    let server_token = shutdown_token.clone();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        server_token.cancelled().await;
        tracing::info!("Server shutdown signal received");
    });
    let server = tokio::spawn(async move { server.await });

    wait_for_signal().await?;
    shutdown_token.cancel();

    server
        .await
        .context("Server task panicked")?
        .context("Server error")?;
    tracing::info!("Shutdown complete");
    Ok(())
}

/// Resolves on SIGINT, or SIGTERM on unix.
async fn wait_for_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm =
            signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.context("Failed to listen for Ctrl+C")?;
                tracing::info!("Received SIGINT, shutting down gracefully...");
            }
            _ = sigterm.recv() => {
                tracing::info!("Received SIGTERM, shutting down gracefully...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for Ctrl+C")?;
        tracing::info!("Received Ctrl+C, shutting down gracefully...");
    }

    Ok(())
}
