//! The stdio to Streamable HTTP relay.
//!
//! Messages are handled strictly in arrival order: a line is not read until
//! the previous exchange has finished and its reply has been written.

use anyhow::Context;
use mcp_relay_types::{JsonRpcMessage, JsonRpcResponse};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::client::McpHttpClient;
use crate::config::Config;
use crate::error::RelayError;
use crate::payload::RemotePayload;
use crate::session::Session;

/// Counters reported when the relay stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    /// Messages sent to the remote endpoint
    pub forwarded: u64,
    /// Input lines dropped because they were not JSON
    pub skipped: u64,
    /// Exchanges that ended in a relay error
    pub failed: u64,
}

/// What `forward` hands back for one message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    /// JSON-RPC object received from the remote endpoint
    Relayed(Value),
    /// Internal error produced by the relay itself
    Failed(JsonRpcResponse),
}

/// Bridges a line-oriented JSON-RPC channel to a remote MCP endpoint.
pub struct Relay {
    client: McpHttpClient,
    session: Session,
    stats: RelayStats,
}

impl Relay {
    pub fn new(config: &Config) -> Result<Self, RelayError> {
        Ok(Self::with_client(McpHttpClient::new(config)?))
    }

    pub fn with_client(client: McpHttpClient) -> Self {
        Self {
            client,
            session: Session::new(),
            stats: RelayStats::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn stats(&self) -> RelayStats {
        self.stats
    }

    /// Forward one message and return the JSON-RPC object to hand back.
    ///
    /// Failures never escape: a request gets an internal-error response with
    /// its own id. A notification never gets anything, whatever the remote
    /// sent back.
    pub async fn forward(&mut self, message: &JsonRpcMessage) -> Option<Reply> {
        self.stats.forwarded += 1;
        debug!(
            "Forwarding: method={:?}, id={:?}, session={:?}",
            message.method(),
            message.id(),
            self.session.id()
        );

        let result = match self.exchange(message).await {
            Ok(None) if !message.is_notification() => Err(RelayError::EmptyReply),
            other => other,
        };

        match result {
            Ok(Some(payload)) if message.is_notification() => {
                warn!(
                    "Dropping reply to notification {:?}: {}",
                    message.method(),
                    payload.value()
                );
                None
            }
            Ok(payload) => payload.map(|p| Reply::Relayed(p.into_value())),
            Err(err) if message.is_notification() => {
                self.stats.failed += 1;
                warn!(
                    "Notification {:?} failed, nothing to report: {}",
                    message.method(),
                    err
                );
                None
            }
            Err(err) => {
                self.stats.failed += 1;
                warn!(
                    "Request {:?} (id {:?}) failed: {}",
                    message.method(),
                    message.id(),
                    err
                );
                let id = message.id().cloned().unwrap_or(Value::Null);
                Some(Reply::Failed(err.into_response(id)))
            }
        }
    }

    /// One HTTP round trip, session bookkeeping and body decoding.
    async fn exchange(
        &mut self,
        message: &JsonRpcMessage,
    ) -> Result<Option<RemotePayload>, RelayError> {
        let mut reply = self.client.post(message, self.session.id()).await?;

        if let Some(id) = reply.session_id.take() {
            self.session.observe(id);
        }

        let decoded = RemotePayload::decode(reply.content_type.as_deref(), &reply.body);
        if reply.status.is_success() {
            return decoded;
        }

        // Error statuses may still carry a JSON-RPC error object worth relaying
        match decoded {
            Ok(Some(payload)) if is_jsonrpc_object(payload.value()) => {
                debug!("Relaying JSON-RPC body of HTTP {}", reply.status);
                Ok(Some(payload))
            }
            _ => Err(RelayError::status(reply.status, &reply.body)),
        }
    }

    /// Pump lines from `input` to the remote endpoint and replies to `output`
    /// until input ends or `shutdown` resolves.
    pub async fn run<R, W, S>(&mut self, input: R, output: W, shutdown: S) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
        S: Future<Output = ()>,
    {
        info!("Relaying stdio to {}", self.client.endpoint());

        let result = tokio::select! {
            result = self.pump(input, output) => result,
            _ = shutdown => {
                info!("Received interrupt, stopping relay");
                Ok(())
            }
        };

        let stats = self.stats;
        info!(
            "Relay stopped: {} forwarded, {} skipped, {} failed",
            stats.forwarded, stats.skipped, stats.failed
        );
        result
    }

    async fn pump<R, W>(&mut self, mut input: R, mut output: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = Vec::new();
        loop {
            line.clear();
            let read = input
                .read_until(b'\n', &mut line)
                .await
                .context("Failed to read from input")?;
            if read == 0 {
                info!("Input closed");
                return Ok(());
            }

            let message = match JsonRpcMessage::parse(&line) {
                Ok(message) => message,
                Err(e) => {
                    if !line.iter().all(u8::is_ascii_whitespace) {
                        self.stats.skipped += 1;
                        debug!("Skipping unparseable input line: {}", e);
                    }
                    continue;
                }
            };

            if let Some(reply) = self.forward(&message).await {
                let mut encoded = serde_json::to_vec(&reply).context("Failed to encode reply")?;
                encoded.push(b'\n');
                output
                    .write_all(&encoded)
                    .await
                    .context("Failed to write to output")?;
                output.flush().await.context("Failed to flush output")?;
            }
        }
    }
}

fn is_jsonrpc_object(value: &Value) -> bool {
    value
        .as_object()
        .map(|obj| obj.contains_key("jsonrpc"))
        .unwrap_or(false)
}
