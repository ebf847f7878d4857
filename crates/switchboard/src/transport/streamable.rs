//! Streamable HTTP Transport
//!
//! - POST / - Send JSON-RPC message, receive the response directly
//! - DELETE / - Terminate session
//!
//! The credential guard runs before anything else, including session lookup
//! and body parsing.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::sync::Arc;

use super::McpState;
use crate::auth::{AuthError, Credential};
use crate::types::error::ErrorData;
use crate::types::jsonrpc::response_json;
use crate::Handler;

pub const SESSION_HEADER: &str = "mcp-session-id";

/// Handle Streamable HTTP requests.
///
/// 1. Resolve the caller's credential, or answer 401
/// 2. Get or create session from Mcp-Session-Id header
/// 3. Parse and dispatch the JSON-RPC message
/// 4. Return the response with the session header (202 for notifications)
#[tracing::instrument(skip_all, fields(session_id = tracing::field::Empty))]
pub async fn streamable_handler<H: Handler>(
    State(state): State<Arc<McpState<H>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let credential = match guard(&state, &headers) {
        Ok(credential) => credential,
        Err(response) => return response,
    };

    let session_hint = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    let session_id = state.sessions.get_or_create(session_hint.as_deref());
    tracing::Span::current().record("session_id", session_id.as_str());
    state.sessions.touch(&session_id);

    let body: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            let error = response_json(
                Value::Null,
                Err(ErrorData::parse_error(format!("Invalid JSON: {}", e))),
            );
            return with_session(StatusCode::BAD_REQUEST, &session_id, Json(error));
        }
    };

    match super::handle_body(&state, &session_id, &credential, body).await {
        Some(response) => with_session(StatusCode::OK, &session_id, Json(response)),
        None => with_session(StatusCode::ACCEPTED, &session_id, ()),
    }
}

/// Handle DELETE requests (session termination).
#[tracing::instrument(skip_all, fields(session_id = tracing::field::Empty))]
pub async fn delete_handler<H: Handler>(
    State(state): State<Arc<McpState<H>>>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = guard(&state, &headers) {
        return response;
    }

    let session_id = match headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok()) {
        Some(id) => id.to_string(),
        None => {
            return (StatusCode::BAD_REQUEST, "Missing Mcp-Session-Id header").into_response();
        }
    };
    tracing::Span::current().record("session_id", session_id.as_str());

    if state.sessions.remove(&session_id) {
        tracing::info!("Session terminated");
        StatusCode::NO_CONTENT.into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

/// Resolve the credential or build the 401 response.
fn guard<H>(state: &McpState<H>, headers: &HeaderMap) -> Result<Credential, Response> {
    state.auth.extract(headers).map_err(|error| {
        tracing::warn!(error = %error, "Rejected request without usable credential");
        unauthorized(&error)
    })
}

fn unauthorized(error: &AuthError) -> Response {
    let body = response_json(Value::Null, Err(ErrorData::unauthorized(error.to_string())));
    let mut response = (StatusCode::UNAUTHORIZED, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    response
}

/// Build response with session ID header.
fn with_session<T: IntoResponse>(status: StatusCode, session_id: &str, body: T) -> Response {
    let mut response = body.into_response();
    *response.status_mut() = status;

    if let Ok(value) = HeaderValue::from_str(session_id) {
        response.headers_mut().insert(SESSION_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthPolicy;
    use crate::protocol::ToolContext;
    use crate::types::protocol::Implementation;
    use crate::types::tool::{CallToolResult, Tool};
    use crate::{streamable_router, McpState};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    /// Counts every time the protocol layer reaches into it.
    #[derive(Default)]
    struct Counting {
        touched: AtomicUsize,
    }

    #[async_trait]
    impl Handler for Counting {
        fn tools(&self) -> Vec<Tool> {
            self.touched.fetch_add(1, Ordering::SeqCst);
            vec![Tool::new("whoami", "Report the caller")]
        }

        async fn call_tool(
            &self,
            _name: &str,
            _arguments: Value,
            context: ToolContext,
        ) -> Result<CallToolResult, ErrorData> {
            self.touched.fetch_add(1, Ordering::SeqCst);
            Ok(CallToolResult::text(context.credential.expose().to_string()))
        }

        fn server_info(&self) -> Implementation {
            Implementation::new("counting", "0.0.1")
        }
    }

    fn app(auth: AuthPolicy) -> (axum::Router, Arc<McpState<Counting>>) {
        let state = Arc::new(McpState::new(Counting::default(), auth));
        (streamable_router(state.clone()), state)
    }

    fn post(body: Value, auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json");
        if let Some(auth) = auth {
            builder = builder.header("authorization", auth);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_missing_credential_is_401_and_never_dispatched() {
        let (router, state) = app(AuthPolicy::per_request());
        let call = json!({
            "jsonrpc": "2.0", "id": 1, "method": "tools/call",
            "params": { "name": "whoami", "arguments": {} }
        });

        let response = router.oneshot(post(call, None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
        assert!(response.headers().get(SESSION_HEADER).is_none());
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], ErrorData::UNAUTHORIZED);
        assert_eq!(state.handler.touched.load(Ordering::SeqCst), 0);
        assert_eq!(state.sessions.stats().total, 0);
    }

    #[tokio::test]
    async fn test_credential_reaches_tool() {
        let (router, _state) = app(AuthPolicy::per_request());
        let call = json!({
            "jsonrpc": "2.0", "id": 1, "method": "tools/call",
            "params": { "name": "whoami" }
        });

        let response = router
            .oneshot(post(call, Some("Bearer key123")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(SESSION_HEADER).is_some());
        let body = body_json(response).await;
        assert_eq!(body["id"], 1);
        assert_eq!(body["result"]["content"][0]["text"], "key123");
    }

    #[tokio::test]
    async fn test_notification_is_202() {
        let (router, _state) = app(AuthPolicy::per_request());
        let note = json!({ "jsonrpc": "2.0", "method": "notifications/initialized" });

        let response = router
            .oneshot(post(note, Some("Bearer key123")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_invalid_json_is_400() {
        let (router, _state) = app(AuthPolicy::per_request());
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header("authorization", "Bearer key123")
            .body(Body::from("{not json"))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], ErrorData::PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_delete_session() {
        let (router, state) = app(AuthPolicy::per_request());
        let id = state.sessions.get_or_create(Some("s-1"));

        let request = Request::builder()
            .method("DELETE")
            .uri("/")
            .header("authorization", "Bearer key123")
            .header(SESSION_HEADER, id.as_str())
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(state.sessions.stats().total, 0);
    }
}
