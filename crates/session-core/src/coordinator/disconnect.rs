//! Disconnect path
//!
//! When a connection drops, the owning session is removed and every table
//! relationship the user held is unwound. Membership is read under each
//! table's lock in turn; the unwind commands run with no table lock held
//! because they take it themselves.

use super::SessionCoordinator;
use crate::connection::ConnectionHandle;
use crate::events::LobbyEvent;
use crate::session::Session;
use crate::table::Table;
use crate::types::{TableId, UserId};
use std::sync::Arc;

/// Which tables a departing user must be unwound from, by relationship.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisconnectPlan {
    /// Seated at a running live game
    pub ongoing: Vec<TableId>,
    /// Seated at a live game that has not started
    pub pending: Vec<TableId>,
    /// Watching, whatever the table's run state
    pub spectating: Vec<TableId>,
}

impl DisconnectPlan {
    /// Classify `user_id`'s relationship to each table.
    ///
    /// Each table is locked only for the membership reads. Seats at replay
    /// tables are ignored; spectating is checked independently of seating.
    pub fn classify(user_id: UserId, tables: &[Arc<Table>]) -> Self {
        let mut plan = Self::default();
        for table in tables {
            let state = table.lock();

            if state.player_index(user_id).is_some() && !state.replay {
                if state.running {
                    plan.ongoing.push(table.id);
                } else {
                    plan.pending.push(table.id);
                }
            }

            if state.spectator_index(user_id).is_some() {
                plan.spectating.push(table.id);
            }
        }
        plan
    }

    pub fn len(&self) -> usize {
        self.ongoing.len() + self.pending.len() + self.spectating.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectOutcome {
    /// The connection no longer owns a session; nothing was touched.
    Stale,
    /// The session was removed and every planned unwind attempted.
    Completed {
        plan: DisconnectPlan,
        /// Unwind commands that returned an error
        failures: usize,
    },
}

#[derive(Debug, Clone, Copy)]
enum Unwind {
    StepAway,
    Leave,
}

impl SessionCoordinator {
    /// Handle a dropped connection.
    ///
    /// Tolerates late or duplicate events: a connection that no longer owns
    /// a session, including one superseded by a reconnect while this call
    /// waited for the lock, yields [`DisconnectOutcome::Stale`].
    pub async fn on_disconnect(&self, connection: &ConnectionHandle) -> DisconnectOutcome {
        let Some(session) = self.sessions.find_by_connection(connection.id()) else {
            tracing::debug!("Ignoring disconnect for unknown connection {}", connection.id());
            return DisconnectOutcome::Stale;
        };

        tracing::debug!("Handling disconnect for user \"{}\"", session.username);

        let _guard = self.connect_lock.lock().await;

        let still_bound = self
            .sessions
            .get(session.user_id)
            .is_some_and(|current| current.is_bound_to(connection));
        if !still_bound {
            tracing::debug!(
                "Connection {} for user \"{}\" was superseded; skipping cleanup",
                connection.id(),
                session.username
            );
            return DisconnectOutcome::Stale;
        }

        self.sessions.remove(session.user_id);
        tracing::info!(
            "User \"{}\" disconnected; {} user(s) now connected.",
            session.username,
            self.sessions.count()
        );

        let plan = DisconnectPlan::classify(session.user_id, &self.tables.list());
        let failures = self.unwind_tables(&session, &plan).await;

        self.events.publish(LobbyEvent::UserDeparted {
            user_id: session.user_id,
            username: session.username.clone(),
        });

        DisconnectOutcome::Completed { plan, failures }
    }

    /// Dispatch the plan bucket by bucket: ongoing, then pending, then
    /// spectating. Failures are logged and counted, never short-circuit.
    async fn unwind_tables(&self, session: &Session, plan: &DisconnectPlan) -> usize {
        let mut failures = 0;

        for &table_id in &plan.ongoing {
            tracing::info!(
                "Unattending player \"{}\" from ongoing table {} since they disconnected.",
                session.username,
                table_id
            );
            if !self.run_unwind(Unwind::StepAway, session, table_id).await {
                failures += 1;
            }
        }

        for &table_id in &plan.pending {
            tracing::info!(
                "Ejecting player \"{}\" from unstarted table {} since they disconnected.",
                session.username,
                table_id
            );
            if !self.run_unwind(Unwind::Leave, session, table_id).await {
                failures += 1;
            }
        }

        for &table_id in &plan.spectating {
            tracing::info!(
                "Ejecting spectator \"{}\" from table {} since they disconnected.",
                session.username,
                table_id
            );
            if !self.run_unwind(Unwind::StepAway, session, table_id).await {
                failures += 1;
            }
            self.mark_disconnected_spectator(session.user_id, table_id);
        }

        failures
    }

    async fn run_unwind(&self, action: Unwind, session: &Session, table_id: TableId) -> bool {
        let result = match action {
            Unwind::StepAway => self.commands.step_away(session.user_id, table_id).await,
            Unwind::Leave => self.commands.leave(session.user_id, table_id).await,
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    "Failed to {:?} user \"{}\" from table {}: {}",
                    action,
                    session.username,
                    table_id,
                    e
                );
                false
            }
        }
    }

    /// Remember the spectator so a reconnect can re-attach them. Tables
    /// destroyed in the meantime are skipped.
    fn mark_disconnected_spectator(&self, user_id: UserId, table_id: TableId) {
        if let Some(table) = self.tables.get(table_id) {
            table.lock().mark_disconnected_spectator(user_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableRegistry;
    use pretty_assertions::assert_eq;

    #[test]
    fn classification_partitions_by_relationship() {
        let tables = TableRegistry::new();
        let user = UserId(1);

        let pending = tables.create("pending");
        pending.lock().add_player(user, "u");

        let ongoing = tables.create("ongoing");
        {
            let mut state = ongoing.lock();
            state.add_player(user, "u");
            state.running = true;
        }

        let replay = tables.create("replay");
        {
            let mut state = replay.lock();
            state.add_player(user, "u");
            state.replay = true;
            state.running = true;
        }

        let watched = tables.create("watched");
        {
            let mut state = watched.lock();
            state.add_player(UserId(2), "other");
            state.running = true;
            state.add_spectator(user);
        }

        let unrelated = tables.create("unrelated");
        unrelated.lock().add_player(UserId(3), "other");

        let plan = DisconnectPlan::classify(user, &tables.list());
        assert_eq!(
            plan,
            DisconnectPlan {
                ongoing: vec![ongoing.id],
                pending: vec![pending.id],
                spectating: vec![watched.id],
            }
        );
        assert_eq!(plan.len(), 3);
    }

    #[test]
    fn seated_and_spectating_are_checked_independently() {
        let tables = TableRegistry::new();
        let user = UserId(1);
        let table = tables.create("both");
        {
            let mut state = table.lock();
            state.add_player(user, "u");
            state.add_spectator(user);
        }

        let plan = DisconnectPlan::classify(user, &tables.list());
        assert_eq!(plan.pending, vec![table.id]);
        assert_eq!(plan.spectating, vec![table.id]);
    }

    #[test]
    fn spectating_a_replay_still_counts() {
        let tables = TableRegistry::new();
        let table = tables.create("replay");
        {
            let mut state = table.lock();
            state.replay = true;
            state.add_spectator(UserId(1));
        }

        let plan = DisconnectPlan::classify(UserId(1), &tables.list());
        assert_eq!(plan.spectating, vec![table.id]);
        assert!(plan.ongoing.is_empty() && plan.pending.is_empty());
    }

    #[test]
    fn no_relationship_means_empty_plan() {
        let tables = TableRegistry::new();
        tables.create("a").lock().add_player(UserId(2), "b");
        assert!(DisconnectPlan::classify(UserId(1), &tables.list()).is_empty());
    }
}
