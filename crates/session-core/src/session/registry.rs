//! Session Registry
//!
//! Maps each user to its single live session. A secondary index resolves a
//! transport connection back to the user that owns it, which is how the
//! disconnect path finds the departing session.
//!
//! The registry itself only guarantees per-call atomicity. Linearizing a
//! connect against a disconnect for the same user is the coordinator's job.

use super::Session;
use crate::types::{ConnectionId, UserId};
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<UserId, Session>,
    by_connection: DashMap<ConnectionId, UserId>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `session`, returning the session it replaced for the same user.
    ///
    /// The swap is a single map write: readers see either the old session or
    /// the new one, never neither.
    pub fn insert(&self, session: Session) -> Option<Session> {
        let user_id = session.user_id;
        let connection_id = session.connection.id();

        // Index first; `find_by_connection` ignores entries whose session
        // is not bound to the connection yet.
        self.by_connection.insert(connection_id, user_id);
        let replaced = self.sessions.insert(user_id, session);
        if let Some(old) = &replaced {
            let old_id = old.connection.id();
            if old_id != connection_id {
                self.by_connection.remove(&old_id);
            }
        }

        tracing::debug!("Registered session for user {} on {}", user_id, connection_id);
        replaced
    }

    /// Remove the session for `user_id`. Absent users are a no-op.
    pub fn remove(&self, user_id: UserId) -> Option<Session> {
        let (_, session) = self.sessions.remove(&user_id)?;
        self.by_connection.remove(&session.connection.id());
        tracing::debug!("Unregistered session for user {}", user_id);
        Some(session)
    }

    pub fn get(&self, user_id: UserId) -> Option<Session> {
        self.sessions.get(&user_id).map(|entry| entry.value().clone())
    }

    /// Resolve a connection to the session currently bound to it.
    pub fn find_by_connection(&self, connection_id: ConnectionId) -> Option<Session> {
        let user_id = self.by_connection.get(&connection_id).map(|entry| *entry.value())?;
        self.sessions
            .get(&user_id)
            .filter(|entry| entry.connection.id() == connection_id)
            .map(|entry| entry.value().clone())
    }

    pub fn contains(&self, user_id: UserId) -> bool {
        self.sessions.contains_key(&user_id)
    }

    /// Number of live sessions
    pub fn count(&self) -> usize {
        self.sessions.len()
    }

    pub fn user_ids(&self) -> Vec<UserId> {
        self.sessions.iter().map(|entry| *entry.key()).collect()
    }
}
