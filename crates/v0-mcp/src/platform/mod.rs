//! The v0 Platform capability interface.
//!
//! The tool layer never builds HTTP requests. It hands a [`PlatformCall`] and
//! the caller's credential to a [`Platform`] and gets parsed JSON back.

pub mod client;
pub mod operation;

pub use client::HttpPlatform;
pub use operation::{Method, Operation};

use async_trait::async_trait;
use serde_json::{Map, Value};
use switchboard::Credential;
use thiserror::Error;

/// One outbound request: which operation, with which parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformCall {
    pub operation: Operation,
    pub params: Map<String, Value>,
}

impl PlatformCall {
    pub fn new(operation: Operation, params: Map<String, Value>) -> Self {
        Self { operation, params }
    }
}

/// Why an upstream call failed. Carried through to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// The platform answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("unreadable response: {0}")]
    Decode(String),

    /// The call could not be turned into a request at all.
    #[error("invalid request: {0}")]
    InvalidCall(String),
}

#[async_trait]
pub trait Platform: Send + Sync {
    /// Perform exactly one request on behalf of `credential`.
    async fn perform(&self, call: PlatformCall, credential: &Credential)
        -> Result<Value, UpstreamError>;
}
