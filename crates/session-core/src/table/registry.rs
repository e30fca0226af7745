//! Table Registry
//!
//! Read-mostly map of live tables. Listing hands out a snapshot of `Arc`s so
//! callers never hold the registry lock while they work on a table.

use super::TableState;
use crate::types::TableId;
use parking_lot::{Mutex, MutexGuard, RwLock};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A single game table. All mutable state sits behind one exclusive lock.
#[derive(Debug)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    state: Mutex<TableState>,
}

impl Table {
    pub fn lock(&self) -> MutexGuard<'_, TableState> {
        self.state.lock()
    }

    pub fn try_lock(&self) -> Option<MutexGuard<'_, TableState>> {
        self.state.try_lock()
    }
}

#[derive(Debug)]
pub struct TableRegistry {
    tables: RwLock<BTreeMap<TableId, Arc<Table>>>,
    next_id: AtomicU64,
}

impl Default for TableRegistry {
    fn default() -> Self {
        Self {
            tables: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty, not-yet-running table with the next free ID.
    pub fn create(&self, name: impl Into<String>) -> Arc<Table> {
        let id = TableId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let table = Arc::new(Table {
            id,
            name: name.into(),
            state: Mutex::new(TableState::new()),
        });
        self.tables.write().insert(id, table.clone());
        tracing::debug!("Created table {} ({})", id, table.name);
        table
    }

    pub fn get(&self, id: TableId) -> Option<Arc<Table>> {
        self.tables.read().get(&id).cloned()
    }

    pub fn delete(&self, id: TableId) -> Option<Arc<Table>> {
        let removed = self.tables.write().remove(&id);
        if removed.is_some() {
            tracing::debug!("Deleted table {}", id);
        }
        removed
    }

    /// Snapshot of all tables, ordered by ID
    pub fn list(&self) -> Vec<Arc<Table>> {
        self.tables.read().values().cloned().collect()
    }

    pub fn count(&self) -> usize {
        self.tables.read().len()
    }
}
