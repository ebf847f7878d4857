//! HTTP implementation of [`Platform`] over reqwest.

use async_trait::async_trait;
use reqwest::Url;
use serde_json::{json, Map, Value};
use std::time::Duration;
use switchboard::Credential;
use thiserror::Error;

use super::{Method, Operation, Platform, PlatformCall, UpstreamError};

const USER_AGENT: &str = concat!("v0-mcp/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("invalid platform base URL '{url}': {reason}")]
    BaseUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Talks to the real platform.
#[derive(Debug, Clone)]
pub struct HttpPlatform {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpPlatform {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ClientBuildError> {
        let parsed = Url::parse(base_url).map_err(|e| ClientBuildError::BaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ClientBuildError::BaseUrl {
                url: base_url.to_string(),
                reason: "not a hierarchical URL".to_string(),
            });
        }

        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url: parsed,
            client: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fill the operation's path template, consuming the parameters it uses.
    fn build_url(
        &self,
        operation: Operation,
        params: &mut Map<String, Value>,
    ) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                UpstreamError::InvalidCall("base URL cannot carry a path".to_string())
            })?;
            segments.pop_if_empty();

            for segment in operation.path().trim_start_matches('/').split('/') {
                match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some(name) => {
                        let value = params.remove(name).ok_or_else(|| {
                            UpstreamError::InvalidCall(format!("{} needs '{}'", operation, name))
                        })?;
                        let text = scalar_text(&value).ok_or_else(|| {
                            UpstreamError::InvalidCall(format!(
                                "'{}' must be a string or number to appear in a path",
                                name
                            ))
                        })?;
                        // push() drops "." and ".." and an empty value leaves
                        // a trailing slash; any of them reroutes the call
                        if matches!(text.as_str(), "" | "." | "..") {
                            return Err(UpstreamError::InvalidCall(format!(
                                "'{}' is not a valid {} value",
                                text, name
                            )));
                        }
                        // push() percent-encodes, including any '/'
                        segments.push(&text);
                    }
                    None => {
                        segments.push(segment);
                    }
                }
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl Platform for HttpPlatform {
    #[tracing::instrument(
        skip_all,
        fields(
            platform.operation = %call.operation,
            http.request.method = %call.operation.method(),
            http.response.status_code = tracing::field::Empty,
        )
    )]
    async fn perform(
        &self,
        call: PlatformCall,
        credential: &Credential,
    ) -> Result<Value, UpstreamError> {
        let PlatformCall {
            operation,
            mut params,
        } = call;
        let method = operation.method();
        let url = self.build_url(operation, &mut params)?;

        let mut request = self
            .client
            .request(reqwest_method(method), url)
            .bearer_auth(credential.expose());

        if method.uses_query() {
            if !params.is_empty() {
                request = request.query(&query_pairs(&params));
            }
        } else {
            request = request.json(&Value::Object(params));
        }

        if let Some(traceparent) = current_traceparent() {
            request = request.header("traceparent", traceparent);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        tracing::Span::current().record("http.response.status_code", status.as_u16());

        let body = response.bytes().await.map_err(transport_error)?;

        if !status.is_success() {
            let message = error_message(&body, status.canonical_reason());
            tracing::debug!(status = status.as_u16(), %message, "Platform returned an error");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message,
            });
        }

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(json!({}));
        }

        serde_json::from_slice(&body).map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn transport_error(e: reqwest::Error) -> UpstreamError {
    if e.is_timeout() {
        UpstreamError::Transport(format!("timed out: {}", e))
    } else {
        UpstreamError::Transport(e.to_string())
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Flatten parameters for a query string. Arrays become comma lists and
/// objects travel as JSON text.
fn query_pairs(params: &Map<String, Value>) -> Vec<(String, String)> {
    params
        .iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::Array(items) => items
                    .iter()
                    .filter_map(scalar_text)
                    .collect::<Vec<_>>()
                    .join(","),
                Value::Object(_) => value.to_string(),
                scalar => scalar_text(scalar)?,
            };
            Some((key.clone(), text))
        })
        .collect()
}

/// Pull a human message out of an error body.
///
/// Tries `error.message`, `message`, then a string `error`, before falling
/// back to the raw body.
fn error_message(body: &[u8], reason: Option<&str>) -> String {
    if let Ok(value) = serde_json::from_slice::<Value>(body) {
        let candidates = [
            value.pointer("/error/message"),
            value.get("message"),
            value.get("error"),
        ];
        for candidate in candidates.into_iter().flatten() {
            if let Some(text) = candidate.as_str().filter(|s| !s.is_empty()) {
                return text.to_string();
            }
        }
    }

    let raw = String::from_utf8_lossy(body);
    let raw = raw.trim();
    if !raw.is_empty() {
        return raw.to_string();
    }
    reason.unwrap_or("no response body").to_string()
}

/// W3C traceparent for the current span, when one is being exported.
fn current_traceparent() -> Option<String> {
    use opentelemetry::trace::TraceContextExt;
    use tracing_opentelemetry::OpenTelemetrySpanExt;

    let span = tracing::Span::current();
    let context = span.context();
    let ctx_span = context.span();
    let span_context = ctx_span.span_context();

    if span_context.is_valid() {
        let flags = if span_context.is_sampled() { "01" } else { "00" };
        Some(format!(
            "00-{}-{}-{}",
            span_context.trace_id(),
            span_context.span_id(),
            flags
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_build_url_fills_and_consumes_placeholders() {
        let platform = HttpPlatform::new("https://api.v0.dev/v1", None).unwrap();
        let mut p = params(json!({ "chatId": "c1", "messageId": "m2", "limit": 5 }));

        let url = platform.build_url(Operation::ChatsGetMessage, &mut p).unwrap();

        assert_eq!(url.as_str(), "https://api.v0.dev/v1/chats/c1/messages/m2");
        assert_eq!(p, params(json!({ "limit": 5 })));
    }

    #[test]
    fn test_build_url_percent_encodes() {
        let platform = HttpPlatform::new("https://api.v0.dev/v1/", None).unwrap();
        let mut p = params(json!({ "chatId": "a/b c" }));

        let url = platform.build_url(Operation::ChatsGetById, &mut p).unwrap();

        assert_eq!(url.as_str(), "https://api.v0.dev/v1/chats/a%2Fb%20c");
    }

    #[test]
    fn test_build_url_missing_placeholder() {
        let platform = HttpPlatform::new("https://api.v0.dev/v1", None).unwrap();
        let err = platform
            .build_url(Operation::HooksGetById, &mut Map::new())
            .unwrap_err();
        assert!(matches!(err, UpstreamError::InvalidCall(_)));
    }

    #[test]
    fn test_build_url_rejects_rerouting_ids() {
        let platform = HttpPlatform::new("https://api.v0.dev/v1", None).unwrap();

        for bad in ["", ".", ".."] {
            let mut p = params(json!({ "chatId": bad }));
            let err = platform.build_url(Operation::ChatsDelete, &mut p).unwrap_err();
            assert!(matches!(err, UpstreamError::InvalidCall(_)), "{:?}", bad);
        }

        let mut p = params(json!({ "chatId": "..", "messageId": "m1" }));
        assert!(platform.build_url(Operation::ChatsGetMessage, &mut p).is_err());

        let mut p = params(json!({ "chatId": "...", "messageId": "m1" }));
        let url = platform.build_url(Operation::ChatsGetMessage, &mut p).unwrap();
        assert_eq!(url.as_str(), "https://api.v0.dev/v1/chats/.../messages/m1");
    }

    #[test]
    fn test_bad_base_url() {
        assert!(matches!(
            HttpPlatform::new("not a url", None),
            Err(ClientBuildError::BaseUrl { .. })
        ));
        assert!(matches!(
            HttpPlatform::new("mailto:someone@example.com", None),
            Err(ClientBuildError::BaseUrl { .. })
        ));
    }

    #[test]
    fn test_query_pairs() {
        let pairs = query_pairs(&params(json!({
            "limit": 10,
            "isFavorite": true,
            "ids": ["a", "b"],
            "skip": null
        })));
        assert!(pairs.contains(&("limit".to_string(), "10".to_string())));
        assert!(pairs.contains(&("isFavorite".to_string(), "true".to_string())));
        assert!(pairs.contains(&("ids".to_string(), "a,b".to_string())));
        assert_eq!(pairs.len(), 3);
    }

    #[test]
    fn test_error_message_sources() {
        assert_eq!(
            error_message(br#"{"error":{"message":"Chat not found","type":"not_found"}}"#, None),
            "Chat not found"
        );
        assert_eq!(error_message(br#"{"message":"Forbidden"}"#, None), "Forbidden");
        assert_eq!(error_message(br#"{"error":"rate limited"}"#, None), "rate limited");
        assert_eq!(error_message(b"upstream exploded", None), "upstream exploded");
        assert_eq!(error_message(b"", Some("Not Found")), "Not Found");
    }
}
