//! MCP session tracking.
//!
//! The remote server assigns a session identifier (usually while answering
//! `initialize`) in the `Mcp-Session-Id` header. The relay echoes the latest
//! value on every later request. There is no way back to `NoSession`: a
//! session only ends when the relay process exits.

use tracing::{debug, info};

/// Session state of one relay instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    /// No session header has been seen yet.
    #[default]
    NoSession,
    /// The last session id issued by the server.
    Active(String),
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// The session id to attach to the next request, if any.
    pub fn id(&self) -> Option<&str> {
        match self {
            Session::NoSession => None,
            Session::Active(id) => Some(id),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Session::Active(_))
    }

    /// Record the session id carried by a response. Last write wins.
    pub fn observe(&mut self, id: String) {
        match self {
            Session::Active(current) if *current == id => {}
            Session::Active(current) => {
                info!("MCP session changed: {} -> {}", current, id);
                *current = id;
            }
            Session::NoSession => {
                info!("MCP session established: {}", id);
                *self = Session::Active(id);
            }
        }
        debug!("MCP session state: {:?}", self);
    }
}
