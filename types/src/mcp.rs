//! MCP Streamable HTTP transport constants.

/// MCP protocol version announced on every outbound request.
pub const PROTOCOL_VERSION: &str = "2025-06-18";

/// Header carrying the session identifier assigned by the server.
pub const MCP_SESSION_ID_HEADER: &str = "mcp-session-id";

/// Header carrying the negotiated protocol version.
pub const MCP_PROTOCOL_VERSION_HEADER: &str = "mcp-protocol-version";

/// Path of the MCP endpoint, appended to the configured base URL.
pub const MCP_ENDPOINT_PATH: &str = "/mcp/";

/// `Accept` value telling the server both reply formats are understood.
pub const ACCEPT_JSON_OR_EVENT_STREAM: &str = "application/json, text/event-stream";

/// Content type of a Server-Sent Events reply.
pub const EVENT_STREAM_CONTENT_TYPE: &str = "text/event-stream";

/// Build the full endpoint URL from a base URL, tolerating a trailing slash.
pub fn endpoint_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), MCP_ENDPOINT_PATH)
}
