//! MCP Protocol Dispatch
//!
//! Routes JSON-RPC methods to the [`Handler`].
//!
//! Implements OpenTelemetry JSON-RPC semantic conventions for observability.
//! See: https://opentelemetry.io/docs/specs/semconv/rpc/json-rpc/

use async_trait::async_trait;
use serde_json::Value;
use tracing::Instrument;

use crate::auth::Credential;
use crate::session::SessionStore;
use crate::types::error::ErrorData;
use crate::types::jsonrpc::JsonRpcMessage;
use crate::types::protocol::{
    negotiate_version, Implementation, InitializeParams, InitializeResult, ServerCapabilities,
};
use crate::types::tool::{CallToolParams, CallToolResult, ListToolsResult, Tool};

/// Per-call context handed to [`Handler::call_tool`].
///
/// Built fresh for every `tools/call` and dropped when the call returns.
#[derive(Clone)]
pub struct ToolContext {
    /// Session ID for this request (`"stdio"` on the stdio transport).
    pub session_id: String,

    /// The caller's credential, resolved by the transport for this request.
    pub credential: Credential,
}

/// Handler trait for MCP server implementations.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    /// Return the list of available tools.
    fn tools(&self) -> Vec<Tool>;

    /// Execute a tool call.
    ///
    /// Tool failures belong in the returned [`CallToolResult`] (with
    /// `is_error` set). An `Err` here becomes a JSON-RPC error and should be
    /// reserved for failures of the server itself.
    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
        context: ToolContext,
    ) -> Result<CallToolResult, ErrorData>;

    /// Return server implementation info.
    fn server_info(&self) -> Implementation;

    /// Return instructions for the LLM.
    fn instructions(&self) -> Option<String> {
        None
    }

    /// Return server capabilities.
    fn capabilities(&self) -> ServerCapabilities {
        ServerCapabilities::with_tools()
    }
}

/// Dispatch a JSON-RPC message to the handler.
///
/// Creates a span following JSON-RPC semantic conventions:
/// - `rpc.system` = "jsonrpc"
/// - `rpc.method` = the JSON-RPC method name
/// - `rpc.jsonrpc.request_id` = the request ID (if present)
/// - `mcp.session_id` = the MCP session identifier
pub async fn dispatch<H: Handler>(
    handler: &H,
    sessions: &dyn SessionStore,
    session_id: &str,
    credential: &Credential,
    message: &JsonRpcMessage,
) -> Result<Value, ErrorData> {
    let request_id = message
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_default();

    let span = tracing::info_span!(
        "mcp.dispatch",
        rpc.system = "jsonrpc",
        rpc.method = %message.method,
        rpc.jsonrpc.version = "2.0",
        rpc.jsonrpc.request_id = %request_id,
        mcp.session_id = %session_id,
        error.type = tracing::field::Empty,
        rpc.jsonrpc.error_code = tracing::field::Empty,
        rpc.jsonrpc.error_message = tracing::field::Empty,
    );

    async {
        let result = dispatch_inner(handler, sessions, session_id, credential, message).await;

        if let Err(ref error) = result {
            let span = tracing::Span::current();
            span.record("error.type", error.error_type());
            span.record("rpc.jsonrpc.error_code", error.code);
            span.record("rpc.jsonrpc.error_message", error.message.as_str());
        }

        result
    }
    .instrument(span)
    .await
}

async fn dispatch_inner<H: Handler>(
    handler: &H,
    sessions: &dyn SessionStore,
    session_id: &str,
    credential: &Credential,
    message: &JsonRpcMessage,
) -> Result<Value, ErrorData> {
    match message.method.as_str() {
        // Lifecycle
        "initialize" => handle_initialize(handler, sessions, session_id, message),
        "notifications/initialized" => Ok(Value::Null),
        "ping" => Ok(serde_json::json!({})),

        // Tools
        "tools/list" => to_result(&ListToolsResult::all(handler.tools())),
        "tools/call" => handle_call_tool(handler, session_id, credential, message).await,

        _ => Err(ErrorData::method_not_found(&message.method)),
    }
}

fn handle_initialize<H: Handler>(
    handler: &H,
    sessions: &dyn SessionStore,
    session_id: &str,
    request: &JsonRpcMessage,
) -> Result<Value, ErrorData> {
    let params: InitializeParams = parse_params(request, "initialize")?;

    sessions.set_initialized(session_id, params.client_info);

    let result = InitializeResult::new(
        negotiate_version(&params.protocol_version),
        handler.server_info(),
        handler.capabilities(),
    );
    let result = match handler.instructions() {
        Some(instructions) => result.with_instructions(instructions),
        None => result,
    };

    to_result(&result)
}

async fn handle_call_tool<H: Handler>(
    handler: &H,
    session_id: &str,
    credential: &Credential,
    request: &JsonRpcMessage,
) -> Result<Value, ErrorData> {
    let params: CallToolParams = parse_params(request, "call")?;

    // A missing or null `arguments` member is an empty call, not a bad one.
    let arguments = match params.arguments {
        None | Some(Value::Null) => Value::Object(serde_json::Map::new()),
        Some(other) => other,
    };

    let context = ToolContext {
        session_id: session_id.to_string(),
        credential: credential.clone(),
    };

    let tool_span = tracing::info_span!(
        "mcp.tool.call",
        mcp.tool.name = %params.name,
        mcp.session_id = %session_id,
    );

    async {
        let result = handler.call_tool(&params.name, arguments, context).await?;
        to_result(&result)
    }
    .instrument(tool_span)
    .await
}

fn parse_params<T: serde::de::DeserializeOwned>(
    request: &JsonRpcMessage,
    what: &str,
) -> Result<T, ErrorData> {
    let params = request
        .params
        .clone()
        .ok_or_else(|| ErrorData::invalid_params(format!("Missing {} params", what)))?;
    serde_json::from_value(params)
        .map_err(|e| ErrorData::invalid_params(format!("Invalid {} params: {}", what, e)))
}

fn to_result<T: serde::Serialize>(value: &T) -> Result<Value, ErrorData> {
    serde_json::to_value(value)
        .map_err(|e| ErrorData::internal_error(format!("Failed to serialize result: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::InMemorySessionStore;
    use serde_json::json;

    struct Echo;

    #[async_trait]
    impl Handler for Echo {
        fn tools(&self) -> Vec<Tool> {
            vec![Tool::new("echo", "Echo arguments")]
        }

        async fn call_tool(
            &self,
            name: &str,
            arguments: Value,
            context: ToolContext,
        ) -> Result<CallToolResult, ErrorData> {
            match name {
                "echo" => Ok(CallToolResult::text(format!(
                    "{} as {}",
                    arguments,
                    context.credential.expose()
                ))),
                other => Ok(CallToolResult::error(format!("unknown tool '{}'", other))),
            }
        }

        fn server_info(&self) -> Implementation {
            Implementation::new("echo", "0.0.1")
        }

        fn instructions(&self) -> Option<String> {
            Some("echo things".to_string())
        }
    }

    async fn run(message: JsonRpcMessage) -> Result<Value, ErrorData> {
        let sessions = InMemorySessionStore::new();
        let session_id = sessions.get_or_create(None);
        let credential = Credential::new("key123").unwrap();
        dispatch(&Echo, &sessions, &session_id, &credential, &message).await
    }

    #[tokio::test]
    async fn test_initialize_negotiates_and_marks_session() {
        let sessions = InMemorySessionStore::new();
        let session_id = sessions.get_or_create(None);
        let credential = Credential::new("key123").unwrap();
        let message = JsonRpcMessage::request(
            1,
            "initialize",
            json!({
                "protocolVersion": "2025-03-26",
                "capabilities": {},
                "clientInfo": { "name": "agent", "version": "1.0" }
            }),
        );

        let result = dispatch(&Echo, &sessions, &session_id, &credential, &message)
            .await
            .unwrap();

        assert_eq!(result["protocolVersion"], "2025-03-26");
        assert_eq!(result["serverInfo"]["name"], "echo");
        assert_eq!(result["instructions"], "echo things");
        assert!(sessions.get(&session_id).unwrap().initialized);
    }

    #[tokio::test]
    async fn test_tools_list() {
        let result = run(JsonRpcMessage::request(2, "tools/list", json!({})))
            .await
            .unwrap();
        assert_eq!(result["tools"][0]["name"], "echo");
    }

    #[tokio::test]
    async fn test_tools_call_threads_credential() {
        let result = run(JsonRpcMessage::request(
            3,
            "tools/call",
            json!({ "name": "echo", "arguments": { "a": 1 } }),
        ))
        .await
        .unwrap();
        assert_eq!(result["content"][0]["text"], "{\"a\":1} as key123");
    }

    #[tokio::test]
    async fn test_tools_call_null_arguments_become_empty_object() {
        let result = run(JsonRpcMessage::request(
            4,
            "tools/call",
            json!({ "name": "echo", "arguments": null }),
        ))
        .await
        .unwrap();
        assert_eq!(result["content"][0]["text"], "{} as key123");
    }

    #[tokio::test]
    async fn test_tools_call_without_params_is_invalid() {
        let mut message = JsonRpcMessage::request(5, "tools/call", Value::Null);
        message.params = None;
        let err = run(message).await.unwrap_err();
        assert_eq!(err.code, ErrorData::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let err = run(JsonRpcMessage::request(6, "resources/list", json!({})))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorData::METHOD_NOT_FOUND);
    }
}
