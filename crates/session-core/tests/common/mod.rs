//! Common test helpers for session-core integration tests
//!
//! Provides a fully wired coordinator whose table commands are recorded, so
//! tests can assert on dispatch order and on the table lock state at the
//! moment each command ran.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tablehub_session_core::{
    CloseReason, ConnectionHandle, CoordinatorConfig, EventBus, LobbyEvent, Result,
    SessionCoordinator, SessionError, SessionRegistry, Table, TableCommandHandler, TableCommands,
    TableId, TableRegistry, UserId,
};
use tokio::sync::{broadcast, mpsc};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Leave(TableId),
    StepAway(TableId),
}

/// Records every command, then forwards to the real handler unless the
/// table is configured to fail.
pub struct RecordingCommands {
    tables: Arc<TableRegistry>,
    inner: TableCommandHandler,
    calls: Mutex<Vec<Call>>,
    fail_on: Mutex<HashSet<TableId>>,
    saw_held_lock: AtomicBool,
}

impl RecordingCommands {
    pub fn new(tables: Arc<TableRegistry>, events: EventBus) -> Self {
        Self {
            inner: TableCommandHandler::new(tables.clone(), events),
            tables,
            calls: Mutex::new(Vec::new()),
            fail_on: Mutex::new(HashSet::new()),
            saw_held_lock: AtomicBool::new(false),
        }
    }

    pub fn fail_on(&self, table_id: TableId) {
        self.fail_on.lock().insert(table_id);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Whether any command ran while its table's lock was already held
    pub fn saw_held_lock(&self) -> bool {
        self.saw_held_lock.load(Ordering::SeqCst)
    }

    fn record(&self, call: Call, table_id: TableId) -> Result<()> {
        self.calls.lock().push(call);
        if let Some(table) = self.tables.get(table_id) {
            if table.try_lock().is_none() {
                self.saw_held_lock.store(true, Ordering::SeqCst);
            }
        }
        if self.fail_on.lock().contains(&table_id) {
            return Err(SessionError::internal(format!("injected failure on table {}", table_id)));
        }
        Ok(())
    }
}

#[async_trait]
impl TableCommands for RecordingCommands {
    async fn leave(&self, user_id: UserId, table_id: TableId) -> Result<()> {
        self.record(Call::Leave(table_id), table_id)?;
        self.inner.leave(user_id, table_id).await
    }

    async fn step_away(&self, user_id: UserId, table_id: TableId) -> Result<()> {
        self.record(Call::StepAway(table_id), table_id)?;
        self.inner.step_away(user_id, table_id).await
    }
}

pub struct Harness {
    pub coordinator: Arc<SessionCoordinator>,
    pub sessions: Arc<SessionRegistry>,
    pub tables: Arc<TableRegistry>,
    pub events: EventBus,
    pub commands: Arc<RecordingCommands>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(CoordinatorConfig::default())
    }

    pub fn with_config(config: CoordinatorConfig) -> Self {
        init_tracing();
        let sessions = Arc::new(SessionRegistry::new());
        let tables = Arc::new(TableRegistry::new());
        let events = EventBus::new(config.event_capacity);
        let commands = Arc::new(RecordingCommands::new(tables.clone(), events.clone()));
        let coordinator = Arc::new(SessionCoordinator::new(
            sessions.clone(),
            tables.clone(),
            commands.clone(),
            events.clone(),
            config,
        ));
        Self {
            coordinator,
            sessions,
            tables,
            events,
            commands,
        }
    }

    /// Connect `user` on a fresh connection.
    pub async fn connect(
        &self,
        user: u64,
    ) -> (ConnectionHandle, mpsc::UnboundedReceiver<CloseReason>) {
        let (handle, rx) = ConnectionHandle::new();
        self.coordinator
            .on_connect(UserId(user), format!("user{}", user), handle.clone())
            .await;
        (handle, rx)
    }

    pub fn pending_table(&self, seated: &[u64]) -> Arc<Table> {
        let table = self.tables.create("pending");
        {
            let mut state = table.lock();
            for &id in seated {
                state.add_player(UserId(id), format!("user{}", id));
            }
        }
        table
    }

    pub fn running_table(&self, seated: &[u64]) -> Arc<Table> {
        let table = self.pending_table(seated);
        table.lock().running = true;
        table
    }

    pub fn watched_table(&self, spectators: &[u64]) -> Arc<Table> {
        let table = self.running_table(&[900, 901]);
        {
            let mut state = table.lock();
            for &id in spectators {
                state.add_spectator(UserId(id));
            }
        }
        table
    }
}

/// Drain everything currently queued on a subscriber.
pub fn drain(rx: &mut broadcast::Receiver<LobbyEvent>) -> Vec<LobbyEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
