//! Shared types for the MCP relay.
//!
//! This crate contains the JSON-RPC 2.0 message model and the constants of
//! the MCP Streamable HTTP transport. It performs no I/O.

pub mod jsonrpc;
pub mod mcp;

// Re-export commonly used types
pub use jsonrpc::{JsonRpcError, JsonRpcMessage, JsonRpcResponse, JSONRPC_VERSION};
pub use mcp::{
    ACCEPT_JSON_OR_EVENT_STREAM, EVENT_STREAM_CONTENT_TYPE, MCP_ENDPOINT_PATH,
    MCP_PROTOCOL_VERSION_HEADER, MCP_SESSION_ID_HEADER, PROTOCOL_VERSION,
};
