//! Per-table mutable state, guarded by the owning [`Table`](super::Table)'s lock.

use crate::types::UserId;
use indexmap::IndexSet;
use serde::Serialize;
use std::collections::HashSet;

/// A seated player. `present` goes false when the player steps away from a
/// running game; the seat itself is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    pub user_id: UserId,
    pub username: String,
    pub present: bool,
}

#[derive(Debug, Default)]
pub struct TableState {
    /// Seated players in seat order
    pub players: Vec<Player>,
    /// Users watching the table, in arrival order
    pub spectators: IndexSet<UserId>,
    /// The game has started
    pub running: bool,
    /// Historical replay rather than a live game
    pub replay: bool,
    /// Users to silently re-attach as spectators when they reconnect.
    /// Never overlaps `spectators`.
    pub disconnected_spectators: HashSet<UserId>,
}

impl TableState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player_index(&self, user_id: UserId) -> Option<usize> {
        self.players.iter().position(|p| p.user_id == user_id)
    }

    pub fn spectator_index(&self, user_id: UserId) -> Option<usize> {
        self.spectators.get_index_of(&user_id)
    }

    /// Seat a player. Returns false if already seated.
    pub fn add_player(&mut self, user_id: UserId, username: impl Into<String>) -> bool {
        if self.player_index(user_id).is_some() {
            return false;
        }
        self.players.push(Player {
            user_id,
            username: username.into(),
            present: true,
        });
        true
    }

    /// Remove a player, keeping the remaining seat order.
    pub fn remove_player(&mut self, user_id: UserId) -> Option<Player> {
        let index = self.player_index(user_id)?;
        Some(self.players.remove(index))
    }

    /// Mark a seated player present or absent. Returns false if not seated
    /// or already in that state.
    pub fn set_present(&mut self, user_id: UserId, present: bool) -> bool {
        match self.players.iter_mut().find(|p| p.user_id == user_id) {
            Some(player) if player.present != present => {
                player.present = present;
                true
            }
            _ => false,
        }
    }

    /// Add a spectator, clearing any pending re-attach mark for them.
    pub fn add_spectator(&mut self, user_id: UserId) -> bool {
        self.disconnected_spectators.remove(&user_id);
        self.spectators.insert(user_id)
    }

    pub fn remove_spectator(&mut self, user_id: UserId) -> bool {
        self.spectators.shift_remove(&user_id)
    }

    /// Record that `user_id` left as a spectator because they disconnected.
    /// Returns false if they were already marked.
    pub fn mark_disconnected_spectator(&mut self, user_id: UserId) -> bool {
        self.spectators.shift_remove(&user_id);
        self.disconnected_spectators.insert(user_id)
    }

    /// Consume the re-attach mark for `user_id`, if any.
    pub fn take_disconnected_spectator(&mut self, user_id: UserId) -> bool {
        self.disconnected_spectators.remove(&user_id)
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty() && self.spectators.is_empty()
    }
}
