//! Credential extraction
//!
//! Every inbound request must carry the caller's platform API key. The
//! transport resolves it once, before any JSON-RPC parsing, and threads it
//! into each tool call through [`ToolContext`]. Nothing here caches the
//! credential beyond the request that supplied it.
//!
//! Sources, in order:
//! 1. `Authorization: Bearer <key>`
//! 2. `X-Api-Key: <key>`
//! 3. the policy's fallback key, when the deployment configured one
//!
//! [`ToolContext`]: crate::protocol::ToolContext

use axum::http::HeaderMap;
use thiserror::Error;

/// Header carrying a bare API key, for clients that cannot send bearer auth.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Upper bound on an accepted `Authorization` header.
const MAX_AUTH_HEADER_BYTES: usize = 8192;

/// A caller's platform API key.
///
/// `Debug` and `Display` redact the value so it never lands in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a key, rejecting blank input.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The raw key, for building the outbound `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl std::fmt::Display for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("***")
    }
}

/// Why a request was turned away before dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing credential: send 'Authorization: Bearer <api key>'")]
    Missing,

    #[error("invalid authorization header: {0}")]
    Malformed(&'static str),
}

/// How a transport resolves the caller's credential.
#[derive(Debug, Clone, Default)]
pub struct AuthPolicy {
    /// Process-wide key used when the request carries none. This is the
    /// single-tenant deployment mode; leave unset to require per-request keys.
    pub fallback: Option<Credential>,
}

impl AuthPolicy {
    /// Require a credential on every request.
    pub fn per_request() -> Self {
        Self { fallback: None }
    }

    /// Accept requests without a credential by using `key` for them.
    pub fn with_fallback(key: Credential) -> Self {
        Self {
            fallback: Some(key),
        }
    }

    /// Resolve the credential for one inbound request.
    ///
    /// A malformed `Authorization` header is an error even when a fallback
    /// exists.
    pub fn extract(&self, headers: &HeaderMap) -> Result<Credential, AuthError> {
        if let Some(value) = headers.get(axum::http::header::AUTHORIZATION) {
            let value = value
                .to_str()
                .map_err(|_| AuthError::Malformed("not valid ASCII"))?;
            return parse_bearer(value);
        }

        if let Some(value) = headers.get(API_KEY_HEADER) {
            let value = value
                .to_str()
                .map_err(|_| AuthError::Malformed("x-api-key is not valid ASCII"))?;
            return Credential::new(value).ok_or(AuthError::Malformed("empty x-api-key"));
        }

        self.fallback.clone().ok_or(AuthError::Missing)
    }
}

fn parse_bearer(header: &str) -> Result<Credential, AuthError> {
    if header.len() > MAX_AUTH_HEADER_BYTES {
        return Err(AuthError::Malformed("header too large"));
    }
    let mut parts = header.trim().splitn(2, ' ');
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next().unwrap_or_default();
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::Malformed("expected Bearer scheme"));
    }
    Credential::new(token).ok_or(AuthError::Malformed("empty bearer token"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_bearer_token() {
        let policy = AuthPolicy::per_request();
        let cred = policy
            .extract(&headers(&[("authorization", "Bearer key123")]))
            .unwrap();
        assert_eq!(cred.expose(), "key123");
    }

    #[test]
    fn test_bearer_scheme_is_case_insensitive() {
        let policy = AuthPolicy::per_request();
        let cred = policy
            .extract(&headers(&[("authorization", "bearer   key123  ")]))
            .unwrap();
        assert_eq!(cred.expose(), "key123");
    }

    #[test]
    fn test_wrong_scheme_rejected() {
        let policy = AuthPolicy::with_fallback(Credential::new("fallback").unwrap());
        let err = policy
            .extract(&headers(&[("authorization", "Basic dXNlcjpwYXNz")]))
            .unwrap_err();
        assert_eq!(err, AuthError::Malformed("expected Bearer scheme"));
    }

    #[test]
    fn test_empty_bearer_rejected() {
        let policy = AuthPolicy::per_request();
        let err = policy
            .extract(&headers(&[("authorization", "Bearer ")]))
            .unwrap_err();
        assert!(matches!(err, AuthError::Malformed(_)));
    }

    #[test]
    fn test_api_key_header() {
        let policy = AuthPolicy::per_request();
        let cred = policy.extract(&headers(&[("x-api-key", "key456")])).unwrap();
        assert_eq!(cred.expose(), "key456");
    }

    #[test]
    fn test_missing_without_fallback() {
        let policy = AuthPolicy::per_request();
        assert_eq!(policy.extract(&HeaderMap::new()), Err(AuthError::Missing));
    }

    #[test]
    fn test_fallback_used_when_absent() {
        let policy = AuthPolicy::with_fallback(Credential::new("process-key").unwrap());
        let cred = policy.extract(&HeaderMap::new()).unwrap();
        assert_eq!(cred.expose(), "process-key");
    }

    #[test]
    fn test_request_key_beats_fallback() {
        let policy = AuthPolicy::with_fallback(Credential::new("process-key").unwrap());
        let cred = policy
            .extract(&headers(&[("authorization", "Bearer caller-key")]))
            .unwrap();
        assert_eq!(cred.expose(), "caller-key");
    }

    #[test]
    fn test_credential_is_redacted() {
        let cred = Credential::new("super-secret").unwrap();
        assert_eq!(format!("{:?}", cred), "Credential(***)");
        assert_eq!(cred.to_string(), "***");
        assert!(Credential::new("   ").is_none());
    }
}
