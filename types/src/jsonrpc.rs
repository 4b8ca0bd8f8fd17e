//! JSON-RPC 2.0 message types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Value of the `jsonrpc` member on every message.
pub const JSONRPC_VERSION: &str = "2.0";

/// The method does not exist or is not available.
pub const METHOD_NOT_FOUND: i32 = -32601;
/// Invalid method parameters.
pub const INVALID_PARAMS: i32 = -32602;
/// Internal JSON-RPC error.
pub const INTERNAL_ERROR: i32 = -32603;

/// A JSON-RPC message read from the local channel.
///
/// The raw value is kept untouched so it can be forwarded verbatim, including
/// members this crate knows nothing about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonRpcMessage {
    raw: Value,
}

impl JsonRpcMessage {
    /// Parse one line of input. Any well-formed JSON value is accepted.
    pub fn parse(input: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(input).map(|raw| Self { raw })
    }

    pub fn from_value(raw: Value) -> Self {
        Self { raw }
    }

    /// The `id` member, if the message is an object carrying one.
    pub fn id(&self) -> Option<&Value> {
        self.raw.as_object().and_then(|obj| obj.get("id"))
    }

    /// The `method` member, if present and a string.
    pub fn method(&self) -> Option<&str> {
        self.raw
            .as_object()
            .and_then(|obj| obj.get("method"))
            .and_then(Value::as_str)
    }

    /// A notification is an object without an `id` member. It never receives
    /// a correlated response.
    pub fn is_notification(&self) -> bool {
        self.raw
            .as_object()
            .map(|obj| !obj.contains_key("id"))
            .unwrap_or(false)
    }
}

/// JSON-RPC 2.0 Response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    /// Echo of the request id; `null` when the request id could not be determined.
    #[serde(default)]
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Value, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Create an error response with data.
    pub fn error_with_data(id: Value, code: i32, message: impl Into<String>, data: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: Some(data),
            }),
        }
    }
}

/// JSON-RPC 2.0 Error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}
