//! Session management for the tablehub game server.
//!
//! This crate keeps the global view of who is online and which tables they
//! sit at or watch, and reconciles that view when connections come and go:
//!
//! - [`SessionRegistry`]: one live [`Session`] per user
//! - [`TableRegistry`] and [`TableState`]: per-table players, spectators and
//!   run state, each table behind its own lock
//! - [`TableCommands`]: the leave / step-away commands used to unwind a user
//! - [`SessionCoordinator`]: the connect and disconnect paths, serialized
//!   against each other
//! - [`EventBus`]: outbound [`LobbyEvent`] notifications

pub mod config;
pub mod connection;
pub mod coordinator;
pub mod errors;
pub mod events;
pub mod session;
pub mod table;
pub mod types;

pub use config::CoordinatorConfig;
pub use connection::{CloseReason, ConnectionHandle};
pub use coordinator::{ConnectOutcome, DisconnectOutcome, DisconnectPlan, SessionCoordinator};
pub use errors::{Result, SessionError};
pub use events::{EventBus, LobbyEvent};
pub use session::{Session, SessionRegistry};
pub use table::{Player, Table, TableCommandHandler, TableCommands, TableRegistry, TableState};
pub use types::{ConnectionId, TableId, UserId};

/// Re-export of the types most callers need
pub mod prelude {
    pub use crate::{
        CloseReason, ConnectionHandle, CoordinatorConfig, DisconnectOutcome, EventBus,
        LobbyEvent, Result, SessionCoordinator, SessionError, TableCommands, TableId,
        TableRegistry, UserId,
    };
}
