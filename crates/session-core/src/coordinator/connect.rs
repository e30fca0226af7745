//! Connect path

use super::SessionCoordinator;
use crate::connection::{CloseReason, ConnectionHandle};
use crate::events::LobbyEvent;
use crate::session::Session;
use crate::types::{TableId, UserId};

#[derive(Debug, Clone)]
pub struct ConnectOutcome {
    pub session: Session,
    /// The session this connect displaced, if the user was already online
    pub replaced: Option<Session>,
    /// Tables the user was silently put back on as a spectator
    pub reattached: Vec<TableId>,
}

impl SessionCoordinator {
    /// Install a session for a freshly authenticated connection.
    ///
    /// A user already online from another connection has that connection
    /// closed and its session replaced, so the registry never holds two
    /// sessions for one user.
    pub async fn on_connect(
        &self,
        user_id: UserId,
        username: impl Into<String>,
        connection: ConnectionHandle,
    ) -> ConnectOutcome {
        let session = Session::new(user_id, username, connection);

        let _guard = self.connect_lock.lock().await;

        // The old session stays registered until the swap below, so the
        // user never reads as offline mid-reconnect.
        if let Some(previous) = self.sessions.get(user_id) {
            if !previous.is_bound_to(&session.connection) {
                tracing::info!(
                    "User \"{}\" connected from somewhere else; closing connection {}",
                    previous.username,
                    previous.connection.id()
                );
                previous.connection.close(CloseReason::Superseded);
            }
        }

        let replaced = self.sessions.insert(session.clone());
        tracing::info!(
            "User \"{}\" connected; {} user(s) now connected.",
            session.username,
            self.sessions.count()
        );

        let reattached = if self.config.reattach_spectators {
            self.reattach_spectator(user_id)
        } else {
            Vec::new()
        };
        for &table_id in &reattached {
            tracing::info!(
                "Re-attached spectator \"{}\" to table {}",
                session.username,
                table_id
            );
            self.events.publish(LobbyEvent::SpectatorReattached { table_id, user_id });
        }

        self.events.publish(LobbyEvent::UserConnected {
            user_id,
            username: session.username.clone(),
        });

        ConnectOutcome {
            session,
            replaced,
            reattached,
        }
    }

    /// Move `user_id` back into every table that kept a re-attach mark for
    /// them. One table lock at a time.
    fn reattach_spectator(&self, user_id: UserId) -> Vec<TableId> {
        let mut reattached = Vec::new();
        for table in self.tables.list() {
            let mut state = table.lock();
            if !state.take_disconnected_spectator(user_id) {
                continue;
            }
            // Seated players rejoin through the game, not as spectators.
            if state.player_index(user_id).is_none() {
                state.add_spectator(user_id);
                reattached.push(table.id);
            }
        }
        reattached
    }
}
