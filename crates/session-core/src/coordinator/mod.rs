//! Connect/Disconnect Coordinator
//!
//! Owns the serialization lock shared by the connect and disconnect paths and
//! drives the session and table registries through both.

mod connect;
mod coordinator;
mod disconnect;

pub use connect::ConnectOutcome;
pub use coordinator::SessionCoordinator;
pub use disconnect::{DisconnectOutcome, DisconnectPlan};
