//! Lobby Event System
//!
//! Outbound notifications for other connected clients. Publishing only
//! enqueues onto a `tokio::sync::broadcast` channel; delivery to sockets is
//! the transport's concern.

use crate::types::{TableId, UserId};
use serde::Serialize;
use tokio::sync::broadcast;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LobbyEvent {
    UserConnected { user_id: UserId, username: String },
    UserDeparted { user_id: UserId, username: String },
    TableLeft { table_id: TableId, user_id: UserId },
    TableUnattended { table_id: TableId, user_id: UserId },
    TableDeleted { table_id: TableId },
    SpectatorReattached { table_id: TableId, user_id: UserId },
}

#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<LobbyEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Fire-and-forget publish
    pub fn publish(&self, event: LobbyEvent) {
        if let Err(broadcast::error::SendError(event)) = self.sender.send(event) {
            tracing::debug!("No subscribers for {:?}", event);
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LobbyEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
