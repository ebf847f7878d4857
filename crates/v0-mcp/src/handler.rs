//! MCP handler for the v0 tool surface.

use async_trait::async_trait;
use serde_json::Value;
use switchboard::{CallToolResult, ErrorData, Handler, Implementation, Tool, ToolContext};

use crate::dispatch::Dispatcher;

const INSTRUCTIONS: &str = "\
Tools for the v0 Platform API. Each call acts on behalf of the API key sent \
with the request.

Typical flow: create_chat with a prompt, then send_message to iterate, \
find_chat_versions and get_chat_version to inspect the generated code, and \
create_deployment to ship a version. IDs returned by one tool (chatId, \
versionId, projectId, deploymentId, hookId) are the inputs to the next.

Failures come back as tool results starting with 'Error', never as protocol \
errors.";

pub struct V0Handler {
    dispatcher: Dispatcher,
}

impl V0Handler {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

#[async_trait]
impl Handler for V0Handler {
    fn tools(&self) -> Vec<Tool> {
        self.dispatcher.registry().tools()
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
        context: ToolContext,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(self
            .dispatcher
            .dispatch(name, &arguments, &context.credential)
            .await)
    }

    fn server_info(&self) -> Implementation {
        Implementation::new("v0-mcp", env!("CARGO_PKG_VERSION"))
    }

    fn instructions(&self) -> Option<String> {
        Some(INSTRUCTIONS.to_string())
    }
}
