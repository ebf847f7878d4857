//! The one generic path every tool call takes.

use serde_json::Value;
use std::sync::Arc;
use switchboard::{CallToolResult, Credential};
use tracing::Instrument;

use crate::adapter;
use crate::format::{self, Outcome};
use crate::platform::Platform;
use crate::registry::Registry;
use crate::validate;

/// Looks a tool up, decodes its arguments, performs its upstream call and
/// formats whatever happened.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    platform: Arc<dyn Platform>,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>, platform: Arc<dyn Platform>) -> Self {
        Self { registry, platform }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Always returns an envelope. Failures after this point are tool
    /// results with `is_error` set, never errors.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: &Value,
        credential: &Credential,
    ) -> CallToolResult {
        let span = tracing::info_span!(
            "v0.tool.dispatch",
            tool.name = %name,
            tool.outcome = tracing::field::Empty,
        );

        async {
            let outcome = self.run(name, arguments, credential).await;
            let label = outcome.label();
            tracing::Span::current().record("tool.outcome", label);
            if label != "success" {
                tracing::debug!(outcome = label, "Tool call did not succeed");
            }
            format::format(outcome)
        }
        .instrument(span)
        .await
    }

    async fn run<'a>(
        &'a self,
        name: &str,
        arguments: &Value,
        credential: &Credential,
    ) -> Outcome<'a> {
        let Some(descriptor) = self.registry.lookup(name) else {
            return Outcome::UnknownTool(name.to_string());
        };

        let decoded = match validate::decode(arguments, &descriptor.params) {
            Ok(decoded) => decoded,
            Err(failure) => return Outcome::Invalid { descriptor, failure },
        };

        match adapter::execute(descriptor, decoded, self.platform.as_ref(), credential).await {
            Ok(response) => Outcome::Success {
                descriptor,
                response,
            },
            Err(error) => {
                tracing::warn!(
                    operation = %descriptor.operation,
                    error = %error,
                    "Platform call failed"
                );
                Outcome::Upstream { descriptor, error }
            }
        }
    }
}
