//! Shared test fixtures.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use switchboard::Credential;
use v0_mcp::platform::Operation;
use v0_mcp::{build_handler, Platform, PlatformCall, UpstreamError, V0Handler};

/// One call the stub saw, with the key it was made with.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub call: PlatformCall,
    pub api_key: String,
}

/// A [`Platform`] that answers from canned responses and records every call.
/// Operations without a canned response answer `{}`.
#[derive(Default)]
pub struct StubPlatform {
    responses: Mutex<HashMap<Operation, Result<Value, UpstreamError>>>,
    calls: Mutex<Vec<Recorded>>,
}

impl StubPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, operation: Operation, response: Value) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(operation, Ok(response));
        self
    }

    pub fn fail(self, operation: Operation, error: UpstreamError) -> Self {
        self.responses.lock().unwrap().insert(operation, Err(error));
        self
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Platform for StubPlatform {
    async fn perform(
        &self,
        call: PlatformCall,
        credential: &Credential,
    ) -> Result<Value, UpstreamError> {
        let operation = call.operation;
        self.calls.lock().unwrap().push(Recorded {
            call,
            api_key: credential.expose().to_string(),
        });
        self.responses
            .lock()
            .unwrap()
            .get(&operation)
            .cloned()
            .unwrap_or_else(|| Ok(json!({})))
    }
}

pub fn key(raw: &str) -> Credential {
    Credential::new(raw).unwrap()
}

/// A handler over `stub`, keeping a handle on the stub for assertions.
pub fn handler(stub: StubPlatform) -> (V0Handler, Arc<StubPlatform>) {
    let stub = Arc::new(stub);
    let handler = build_handler(stub.clone()).unwrap();
    (handler, stub)
}
