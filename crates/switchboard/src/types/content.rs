//! Content Types
//!
//! Content blocks carried in tool results.
//! Per MCP 2025-06-18 schema lines 428-446. Only text blocks are produced by
//! this library; the enum stays tagged so the wire shape matches the schema.

use serde::{Deserialize, Serialize};

/// Content block in a tool result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Content {
    /// Text content.
    Text { text: String },
}

impl Content {
    /// Create text content.
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text { text: text.into() }
    }

    /// Get the text if this is text content.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text { text } => Some(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_content_wire_shape() {
        let content = Content::text("Hello, World!");

        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["text"], "Hello, World!");
    }

    #[test]
    fn test_parse_text_content() {
        let parsed: Content =
            serde_json::from_str(r#"{"type":"text","text":"chat c1 created"}"#).unwrap();
        assert_eq!(parsed.as_text(), Some("chat c1 created"));
    }
}
