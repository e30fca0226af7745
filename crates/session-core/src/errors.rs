//! Error Types for Session Core

use crate::types::TableId;
use thiserror::Error;

/// Main result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// Main error type for session and table operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Table not found: {0}")]
    TableNotFound(TableId),

    #[error("Invalid table state: {0}")]
    InvalidState(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SessionError {
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        SessionError::InvalidState(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        SessionError::Internal(msg.into())
    }
}

impl From<tablehub_infra_common::Error> for SessionError {
    fn from(err: tablehub_infra_common::Error) -> Self {
        SessionError::Config(err.to_string())
    }
}
