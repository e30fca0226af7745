use crate::connection::ConnectionHandle;
use crate::types::UserId;
use chrono::{DateTime, Utc};

/// The live binding between a logical user and one active connection
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: UserId,
    pub username: String,
    pub connection: ConnectionHandle,
    pub connected_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: UserId, username: impl Into<String>, connection: ConnectionHandle) -> Self {
        Self {
            user_id,
            username: username.into(),
            connection,
            connected_at: Utc::now(),
        }
    }

    /// Whether this session is bound to the given connection handle
    pub fn is_bound_to(&self, connection: &ConnectionHandle) -> bool {
        self.connection.id() == connection.id()
    }
}
