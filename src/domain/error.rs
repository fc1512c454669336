use std::time::Duration;

use thiserror::Error;

/// Failure modes of todo operations, shared by every store backend.
#[derive(Debug, Error)]
pub enum TodoError {
    /// Request data failed validation before reaching the store
    #[error("{0}")]
    Validation(String),

    #[error("invalid todo id: {0}")]
    InvalidId(String),

    #[error("todo not found: {0}")]
    NotFound(String),

    /// Backend unreachable, write failed, or stored data unreadable
    #[error("storage error: {0}")]
    Storage(String),

    #[error("storage operation timed out after {0:?}")]
    Timeout(Duration),
}

impl TodoError {
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Timeout(_))
    }
}

impl From<sqlx::Error> for TodoError {
    fn from(e: sqlx::Error) -> Self { Self::Storage(e.to_string()) }
}
