//! Session error types.

use thiserror::Error;
use vartab_core::CoreError;
use vartab_pairs::PairError;

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Document edit error.
    #[error("document error: {0}")]
    Core(#[from] CoreError),

    /// Note addressing error.
    #[error("note error: {0}")]
    Pair(#[from] PairError),

    /// Persisted document could not be read or written.
    #[error("persistence error: {0}")]
    Json(#[from] serde_json::Error),

    /// No constraint at this position.
    #[error("constraint not found at index {index}")]
    ConstraintNotFound { index: usize },
}

impl SessionError {
    pub fn constraint_not_found(index: usize) -> Self {
        Self::ConstraintNotFound { index }
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
