//! Tool registry.
//!
//! Built once at start-up, then shared read-only behind an `Arc`.

use serde_json::Value;
use std::collections::HashMap;
use switchboard::{Tool, ToolAnnotations};
use thiserror::Error;

use crate::adapter::{self, Reshape};
use crate::format;
use crate::platform::Operation;
use crate::schema::{Param, ParamSchema};

/// Renders a successful platform response as the tool's text.
pub type Render = fn(&Value) -> String;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("tool '{0}' is already registered")]
    DuplicateToolName(String),
}

/// Everything needed to list and run one tool.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub params: ParamSchema,
    /// The single platform operation this tool calls.
    pub operation: Operation,
    pub reshape: Reshape,
    /// Phrase used in failures: `Error <action>: ...`.
    pub action: &'static str,
    pub render: Render,
    pub read_only: bool,
    pub destructive: bool,
    pub idempotent: bool,
}

impl ToolDescriptor {
    /// A tool with no parameters that passes arguments straight through and
    /// renders the raw response.
    pub fn new(
        name: &'static str,
        operation: Operation,
        action: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            description,
            params: ParamSchema::empty(),
            operation,
            reshape: adapter::passthrough,
            action,
            render: format::render_json,
            read_only: false,
            destructive: false,
            idempotent: false,
        }
    }

    pub fn params(mut self, params: Vec<Param>) -> Self {
        self.params = ParamSchema::new(params);
        self
    }

    pub fn reshape(mut self, reshape: Reshape) -> Self {
        self.reshape = reshape;
        self
    }

    pub fn render(mut self, render: Render) -> Self {
        self.render = render;
        self
    }

    /// Reads only; implies idempotent.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self.idempotent = true;
        self
    }

    pub fn destructive(mut self) -> Self {
        self.destructive = true;
        self
    }

    pub fn idempotent(mut self) -> Self {
        self.idempotent = true;
        self
    }

    /// The `tools/list` entry for this tool.
    pub fn to_tool(&self) -> Tool {
        Tool::new(self.name, self.description)
            .with_input_schema(self.params.to_tool_schema())
            .with_annotations(
                ToolAnnotations::default()
                    .with_read_only(self.read_only)
                    .with_destructive(self.destructive)
                    .with_idempotent(self.idempotent)
                    .with_open_world(true),
            )
    }
}

/// Name-indexed set of tool descriptors, in registration order.
#[derive(Debug, Default)]
pub struct Registry {
    tools: Vec<ToolDescriptor>,
    index: HashMap<&'static str, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, descriptor: ToolDescriptor) -> Result<(), RegistryError> {
        if self.index.contains_key(descriptor.name) {
            return Err(RegistryError::DuplicateToolName(descriptor.name.to_string()));
        }
        self.index.insert(descriptor.name, self.tools.len());
        self.tools.push(descriptor);
        Ok(())
    }

    pub fn register_all(
        &mut self,
        descriptors: impl IntoIterator<Item = ToolDescriptor>,
    ) -> Result<(), RegistryError> {
        descriptors.into_iter().try_for_each(|d| self.register(d))
    }

    pub fn lookup(&self, name: &str) -> Option<&ToolDescriptor> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn descriptors(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn tools(&self) -> Vec<Tool> {
        self.tools.iter().map(ToolDescriptor::to_tool).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
