//! Core SessionCoordinator structure and wiring

use crate::config::CoordinatorConfig;
use crate::events::EventBus;
use crate::session::SessionRegistry;
use crate::table::{TableCommandHandler, TableCommands, TableRegistry};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Reconciles connection lifecycle events with the session and table
/// registries.
///
/// Connects and disconnects are linearized by one lock, so a fast reconnect
/// can never lose its fresh session to the old connection's late disconnect.
/// Game commands do not take this lock; tables are protected by their own.
pub struct SessionCoordinator {
    pub(super) sessions: Arc<SessionRegistry>,
    pub(super) tables: Arc<TableRegistry>,
    pub(super) commands: Arc<dyn TableCommands>,
    pub(super) events: EventBus,
    pub(super) config: CoordinatorConfig,
    pub(super) connect_lock: Mutex<()>,
}

impl SessionCoordinator {
    /// Build a coordinator over injected collaborators.
    pub fn new(
        sessions: Arc<SessionRegistry>,
        tables: Arc<TableRegistry>,
        commands: Arc<dyn TableCommands>,
        events: EventBus,
        config: CoordinatorConfig,
    ) -> Self {
        Self {
            sessions,
            tables,
            commands,
            events,
            config,
            connect_lock: Mutex::new(()),
        }
    }

    /// Build a coordinator with fresh registries and the in-process
    /// [`TableCommandHandler`].
    pub fn with_config(config: CoordinatorConfig) -> Self {
        let sessions = Arc::new(SessionRegistry::new());
        let tables = Arc::new(TableRegistry::new());
        let events = EventBus::new(config.event_capacity);
        let commands = Arc::new(TableCommandHandler::new(tables.clone(), events.clone()));
        Self::new(sessions, tables, commands, events, config)
    }

    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }

    pub fn tables(&self) -> &Arc<TableRegistry> {
        &self.tables
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }
}
