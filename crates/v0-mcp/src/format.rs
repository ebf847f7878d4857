//! Result formatting.
//!
//! Every dispatch ends here. [`format`] takes any [`Outcome`] and produces
//! a [`CallToolResult`]; there is no failure path out of it.
//!
//! The helpers below read platform JSON leniently. The upstream shapes drift
//! between API revisions, so a missing field renders as absent instead of
//! failing the call.

use serde_json::Value;
use switchboard::CallToolResult;

use crate::platform::UpstreamError;
use crate::registry::ToolDescriptor;
use crate::validate::ValidationFailure;

/// How one dispatch ended.
#[derive(Debug)]
pub enum Outcome<'a> {
    Success {
        descriptor: &'a ToolDescriptor,
        response: Value,
    },
    UnknownTool(String),
    Invalid {
        descriptor: &'a ToolDescriptor,
        failure: ValidationFailure,
    },
    Upstream {
        descriptor: &'a ToolDescriptor,
        error: UpstreamError,
    },
}

impl Outcome<'_> {
    /// Short label for spans and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Success { .. } => "success",
            Outcome::UnknownTool(_) => "unknown_tool",
            Outcome::Invalid { .. } => "invalid_arguments",
            Outcome::Upstream { .. } => "upstream_error",
        }
    }
}

pub fn format(outcome: Outcome<'_>) -> CallToolResult {
    match outcome {
        Outcome::Success {
            descriptor,
            response,
        } => CallToolResult::text((descriptor.render)(&response)),
        Outcome::UnknownTool(name) => {
            CallToolResult::error(format!("Error: unknown tool '{}'", name))
        }
        Outcome::Invalid {
            descriptor,
            failure,
        } => CallToolResult::error(format!("Error {}: {}", descriptor.action, failure)),
        Outcome::Upstream { descriptor, error } => {
            CallToolResult::error(format!("Error {}: {}", descriptor.action, error))
        }
    }
}

/// Default renderer: the response as pretty JSON.
pub fn render_json(response: &Value) -> String {
    serde_json::to_string_pretty(response).unwrap_or_else(|_| response.to_string())
}

/// The first of `paths` (JSON pointers) that holds a scalar, as text.
pub fn pick(value: &Value, paths: &[&str]) -> Option<String> {
    paths.iter().find_map(|path| match value.pointer(path)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// List items from either `{"data": [...]}` or a bare array.
pub fn items(value: &Value) -> &[Value] {
    value
        .get("data")
        .and_then(Value::as_array)
        .or_else(|| value.as_array())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Builds `heading` followed by `label: value` lines, skipping absent values.
#[derive(Debug, Default)]
pub struct Summary {
    lines: Vec<String>,
}

impl Summary {
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            lines: vec![heading.into()],
        }
    }

    pub fn line(mut self, label: &str, value: Option<String>) -> Self {
        if let Some(value) = value {
            self.lines.push(format!("{}: {}", label, value));
        }
        self
    }

    /// A field read straight from `source`.
    pub fn field(self, label: &str, source: &Value, paths: &[&str]) -> Self {
        let value = pick(source, paths);
        self.line(label, value)
    }

    pub fn finish(self) -> String {
        self.lines.join("\n")
    }
}

/// `Found N <noun>:` then one `- ` line per item.
pub fn render_list(response: &Value, noun: &str, item: fn(&Value) -> String) -> String {
    let entries = items(response);
    if entries.is_empty() {
        return format!("No {} found.", noun);
    }

    let mut text = format!("Found {} {}:", entries.len(), noun);
    for entry in entries {
        text.push_str("\n- ");
        text.push_str(&item(entry));
    }
    text
}

/// `<name> (ID: <id>)`, or just whichever is present.
pub fn name_and_id(entry: &Value, name_paths: &[&str]) -> String {
    match (pick(entry, name_paths), pick(entry, &["/id"])) {
        (Some(name), Some(id)) => format!("{} (ID: {})", name, id),
        (None, Some(id)) => format!("ID: {}", id),
        (Some(name), None) => name,
        (None, None) => "unknown".to_string(),
    }
}
