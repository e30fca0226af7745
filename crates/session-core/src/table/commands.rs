//! Table Commands
//!
//! The unwind actions the coordinator dispatches on disconnect. Each command
//! takes the table lock itself, so callers must not hold it.

use super::TableRegistry;
use crate::errors::{Result, SessionError};
use crate::events::{EventBus, LobbyEvent};
use crate::types::{TableId, UserId};
use async_trait::async_trait;
use std::sync::Arc;

/// Table-mutating commands used to unwind a departing user.
///
/// Both commands are idempotent: repeating one for the same user and table
/// after it has taken effect is a no-op.
#[async_trait]
pub trait TableCommands: Send + Sync {
    /// Remove the user's seat from a table that has not started.
    async fn leave(&self, user_id: UserId, table_id: TableId) -> Result<()>;

    /// Mark the user absent from a table while keeping their slot. Any
    /// spectator entry they hold at the table is dropped as well.
    async fn step_away(&self, user_id: UserId, table_id: TableId) -> Result<()>;
}

/// In-process [`TableCommands`] over a [`TableRegistry`].
pub struct TableCommandHandler {
    tables: Arc<TableRegistry>,
    events: EventBus,
}

impl TableCommandHandler {
    pub fn new(tables: Arc<TableRegistry>, events: EventBus) -> Self {
        Self { tables, events }
    }
}

#[async_trait]
impl TableCommands for TableCommandHandler {
    async fn leave(&self, user_id: UserId, table_id: TableId) -> Result<()> {
        let table = self
            .tables
            .get(table_id)
            .ok_or(SessionError::TableNotFound(table_id))?;

        let now_empty = {
            let mut state = table.lock();
            if state.player_index(user_id).is_none() {
                return Ok(());
            }
            if state.running {
                return Err(SessionError::invalid_state(format!(
                    "table {} has already started",
                    table_id
                )));
            }
            state.remove_player(user_id);
            state.players.is_empty()
        };

        tracing::debug!("User {} left table {}", user_id, table_id);
        self.events.publish(LobbyEvent::TableLeft { table_id, user_id });

        if now_empty && self.tables.delete(table_id).is_some() {
            self.events.publish(LobbyEvent::TableDeleted { table_id });
        }
        Ok(())
    }

    async fn step_away(&self, user_id: UserId, table_id: TableId) -> Result<()> {
        let table = self
            .tables
            .get(table_id)
            .ok_or(SessionError::TableNotFound(table_id))?;

        let (changed, abandoned_replay) = {
            let mut state = table.lock();
            let in_game = state.running && !state.replay;
            let seat_released = in_game
                && state.player_index(user_id).is_some()
                && state.set_present(user_id, false);
            // A user may be seated and watching at once; both roles go.
            let stopped_watching = state.remove_spectator(user_id);
            (
                seat_released || stopped_watching,
                state.replay && state.spectators.is_empty(),
            )
        };

        if !changed {
            return Ok(());
        }

        tracing::debug!("User {} stepped away from table {}", user_id, table_id);
        self.events.publish(LobbyEvent::TableUnattended { table_id, user_id });

        if abandoned_replay && self.tables.delete(table_id).is_some() {
            self.events.publish(LobbyEvent::TableDeleted { table_id });
        }
        Ok(())
    }
}
