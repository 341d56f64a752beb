//! Transaction error types.

use thiserror::Error;

/// Snapshot capture failures.
///
/// These never abort an edit: the runner logs them and records no undo
/// entry.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Part of the document cannot be cloned.
    #[error("unclonable value: {0}")]
    Unclonable(String),
}

impl SnapshotError {
    pub fn unclonable(what: impl Into<String>) -> Self {
        Self::Unclonable(what.into())
    }
}

/// Result type for snapshot capture.
pub type SnapshotResult<T> = Result<T, SnapshotError>;
