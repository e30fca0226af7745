//! Game tables: per-table state, the table registry, and the commands that
//! unwind a user's relationship to a table.

mod commands;
mod registry;
mod state;

pub use commands::{TableCommandHandler, TableCommands};
pub use registry::{Table, TableRegistry};
pub use state::{Player, TableState};
