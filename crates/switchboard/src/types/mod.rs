//! MCP Protocol Types
//!
//! The subset of the MCP 2025-06-18 schema a tool server needs:
//!
//! - `jsonrpc` - JSON-RPC 2.0 envelopes
//! - `error` - JSON-RPC error object and standard codes
//! - `protocol` - initialize handshake and capabilities
//! - `tool` - tool definitions and call results
//! - `content` - content blocks carried by call results

pub mod content;
pub mod error;
pub mod jsonrpc;
pub mod protocol;
pub mod tool;
