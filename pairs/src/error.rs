//! Pair and note error types.

use thiserror::Error;
use vartab_core::NoteKey;

/// Errors raised when addressing notes.
#[derive(Debug, Error)]
pub enum PairError {
    /// No live row has this identity.
    #[error("no pair with key {0}")]
    UnknownPair(NoteKey),

    /// The swapped row a dual write must reach is not in the table.
    #[error("mirror row missing for {0}")]
    MirrorMissing(NoteKey),
}

/// Result type for pair operations.
pub type PairResult<T> = Result<T, PairError>;
