//! stdio Transport
//!
//! One JSON-RPC message per line on stdin, one response per line on stdout.
//! There are no request headers on this transport, so every call runs under
//! the policy's fallback credential.

use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::McpState;
use crate::types::error::ErrorData;
use crate::types::jsonrpc::response_json;
use crate::Handler;

/// Session ID used for the single stdio client.
pub const STDIO_SESSION: &str = "stdio";

#[derive(Debug, Error)]
pub enum StdioError {
    #[error("stdio transport needs a fallback API key; there are no request headers to read one from")]
    NoCredential,

    #[error("stdio I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Serve MCP over the process's stdin and stdout until stdin closes.
pub async fn serve_stdio<H: Handler>(state: Arc<McpState<H>>) -> Result<(), StdioError> {
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    serve_lines(&state, stdin, stdout).await
}

/// Serve MCP over any line-oriented reader/writer pair.
pub async fn serve_lines<H, R, W>(
    state: &McpState<H>,
    mut reader: R,
    mut writer: W,
) -> Result<(), StdioError>
where
    H: Handler,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let credential = state.auth.fallback.clone().ok_or(StdioError::NoCredential)?;
    let session_id = state.sessions.get_or_create(Some(STDIO_SESSION));

    tracing::info!("MCP stdio transport ready");

    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            tracing::info!("stdin closed, stopping stdio transport");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        state.sessions.touch(&session_id);

        let response = match serde_json::from_str::<Value>(trimmed) {
            Ok(body) => super::handle_body(state, &session_id, &credential, body).await,
            Err(e) => Some(response_json(
                Value::Null,
                Err(ErrorData::parse_error(format!("Invalid JSON: {}", e))),
            )),
        };

        if let Some(response) = response {
            let mut encoded = serde_json::to_vec(&response)?;
            encoded.push(b'\n');
            writer.write_all(&encoded).await?;
            writer.flush().await?;
        }
    }

    Ok(())
}
