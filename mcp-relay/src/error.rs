//! Errors of a single relayed exchange and their JSON-RPC mapping.

use mcp_relay_types::jsonrpc::{JsonRpcResponse, INTERNAL_ERROR};
use reqwest::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

/// Longest body excerpt carried in a status error.
const BODY_EXCERPT_LEN: usize = 200;

/// Failure of one exchange with the remote endpoint.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Connection, TLS, DNS, timeout or body read failure.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status whose body is not a JSON-RPC message.
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Empty body in answer to a request that expects a response.
    #[error("remote returned an empty response")]
    EmptyReply,

    /// Event stream reply without any `data: ` line.
    #[error("event stream contained no data line")]
    MissingEventData,

    /// Reply body (or event data) is not valid JSON.
    #[error("invalid JSON in response: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl RelayError {
    pub fn status(status: StatusCode, body: &str) -> Self {
        let mut excerpt: String = body.chars().take(BODY_EXCERPT_LEN).collect();
        if excerpt.len() < body.len() {
            excerpt.push_str("...");
        }
        RelayError::Status {
            status,
            body: excerpt,
        }
    }

    /// Map the failure to a JSON-RPC internal error answering request `id`.
    pub fn into_response(self, id: Value) -> JsonRpcResponse {
        let message = format!("Proxy error: {}", self);
        match self {
            RelayError::Status { status, .. } => JsonRpcResponse::error_with_data(
                id,
                INTERNAL_ERROR,
                message,
                json!({ "status": status.as_u16() }),
            ),
            _ => JsonRpcResponse::error(id, INTERNAL_ERROR, message),
        }
    }
}
