//! Relay between the MCP stdio transport and a remote Streamable HTTP server.
//!
//! One JSON-RPC message is read per line of input, POSTed to `<url>/mcp/`,
//! and the reply (plain JSON or a single SSE event) is written back as one
//! line. The `Mcp-Session-Id` issued by the server is tracked and echoed.

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod payload;
pub mod relay;
pub mod session;

pub use config::{Config, ConfigOverrides};
pub use error::RelayError;
pub use payload::RemotePayload;
pub use relay::{Relay, RelayStats, Reply};
pub use session::Session;
