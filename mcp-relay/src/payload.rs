//! Decoding of remote reply bodies.
//!
//! A Streamable HTTP server answers a POST either with a plain JSON body or
//! with a Server-Sent Events stream. The shape is decided once from the
//! `content-type` header and the reply is reduced to a single JSON value.

use mcp_relay_types::EVENT_STREAM_CONTENT_TYPE;
use serde_json::Value;

use crate::error::RelayError;

/// Prefix of an SSE line carrying event data.
const SSE_DATA_PREFIX: &str = "data: ";

/// A decoded reply, tagged with the wire format it arrived in.
#[derive(Debug, Clone, PartialEq)]
pub enum RemotePayload {
    PlainJson(Value),
    EventStream(Value),
}

impl RemotePayload {
    /// Decode `body` according to the declared content type.
    ///
    /// Returns `Ok(None)` for an empty body, which is how servers acknowledge
    /// notifications (`202 Accepted`).
    pub fn decode(content_type: Option<&str>, body: &str) -> Result<Option<Self>, RelayError> {
        if body.trim().is_empty() {
            return Ok(None);
        }

        if is_event_stream(content_type) {
            let data = first_data_line(body).ok_or(RelayError::MissingEventData)?;
            Ok(Some(RemotePayload::EventStream(serde_json::from_str(data)?)))
        } else {
            Ok(Some(RemotePayload::PlainJson(serde_json::from_str(body)?)))
        }
    }

    pub fn value(&self) -> &Value {
        match self {
            RemotePayload::PlainJson(value) | RemotePayload::EventStream(value) => value,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            RemotePayload::PlainJson(value) | RemotePayload::EventStream(value) => value,
        }
    }
}

fn is_event_stream(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| {
            ct.trim_start()
                .to_ascii_lowercase()
                .starts_with(EVENT_STREAM_CONTENT_TYPE)
        })
        .unwrap_or(false)
}

/// Remainder of the first line starting with `data: `.
fn first_data_line(body: &str) -> Option<&str> {
    body.lines().find_map(|line| line.strip_prefix(SSE_DATA_PREFIX))
}
