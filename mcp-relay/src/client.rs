use mcp_relay_types::{
    mcp::endpoint_url, JsonRpcMessage, ACCEPT_JSON_OR_EVENT_STREAM, MCP_PROTOCOL_VERSION_HEADER,
    MCP_SESSION_ID_HEADER,
};
use reqwest::{
    header::{HeaderMap, ACCEPT, CONTENT_TYPE},
    Client, StatusCode,
};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::RelayError;

/// Raw reply of the remote endpoint, before decoding.
#[derive(Debug, Clone)]
pub struct RemoteReply {
    pub status: StatusCode,
    /// Value of the `Mcp-Session-Id` response header
    pub session_id: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

/// HTTP client for a Streamable HTTP MCP endpoint
#[derive(Clone, Debug)]
pub struct McpHttpClient {
    endpoint: String,
    protocol_version: String,
    client: Client,
}

impl McpHttpClient {
    pub fn new(config: &Config) -> Result<Self, RelayError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(concat!("mcp-relay/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            endpoint: endpoint_url(&config.url),
            protocol_version: config.protocol_version.clone(),
            client,
        })
    }

    /// Full URL requests are posted to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST one JSON-RPC message, attaching the session id when there is one
    pub async fn post(
        &self,
        message: &JsonRpcMessage,
        session_id: Option<&str>,
    ) -> Result<RemoteReply, RelayError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(MCP_PROTOCOL_VERSION_HEADER, &self.protocol_version)
            .header(ACCEPT, ACCEPT_JSON_OR_EVENT_STREAM);
        if let Some(id) = session_id {
            request = request.header(MCP_SESSION_ID_HEADER, id);
        }

        let response = request.json(message).send().await?;

        let status = response.status();
        let headers = response.headers();
        let session_id = session_id_from(headers);
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = response.text().await?;

        debug!(
            "MCP reply: status={}, content_type={:?}, session={:?}, {} bytes",
            status,
            content_type,
            session_id,
            body.len()
        );

        Ok(RemoteReply {
            status,
            session_id,
            content_type,
            body,
        })
    }
}

/// Session id of a reply. A value that is not visible ASCII cannot be sent
/// back as a header and is ignored.
fn session_id_from(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(MCP_SESSION_ID_HEADER)?;
    match value.to_str() {
        Ok(id) => Some(id.to_string()),
        Err(_) => {
            warn!(
                "Ignoring non-ASCII {} header: {:?}",
                MCP_SESSION_ID_HEADER, value
            );
            None
        }
    }
}
