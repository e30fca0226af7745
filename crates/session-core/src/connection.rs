//! Transport-facing connection handle
//!
//! The transport layer owns the socket; this crate only needs a stable
//! identity for the connection and a way to ask the transport to close it.

use crate::types::ConnectionId;
use serde::Serialize;
use tokio::sync::mpsc;

/// Why the server asked a connection to close
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CloseReason {
    /// The same user connected again from somewhere else
    Superseded,
    /// The server is going away
    ServerShutdown,
}

/// Cloneable handle to one live transport connection
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    closer: mpsc::UnboundedSender<CloseReason>,
}

impl ConnectionHandle {
    /// Create a handle plus the receiver the transport task listens on for
    /// close requests.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<CloseReason>) {
        let (closer, rx) = mpsc::unbounded_channel();
        (
            Self {
                id: ConnectionId::new(),
                closer,
            },
            rx,
        )
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Ask the transport to close this connection. A transport that has
    /// already gone away is ignored.
    pub fn close(&self, reason: CloseReason) {
        if self.closer.send(reason).is_err() {
            tracing::debug!("Connection {} already closed", self.id);
        }
    }
}
