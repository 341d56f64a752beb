//! vartab Transaction
//!
//! The only sanctioned write path into a document.
//!
//! Responsibilities:
//! - Run edits inside explicit, nestable transaction boundaries
//! - Merge side-effect requests from nested edits into the outermost boundary
//! - Flush effects once: rebuild, invalidate, layout, render, status
//! - Capture before/after snapshots and keep a bounded undo/redo history
//! - Restore documents in place on undo, redo and cancellation

mod effects;
mod error;
mod history;
mod runner;
mod snapshot;

pub use effects::{Effect, MutationOptions, PendingEffects, StatusFormatter, UndoOptions};
pub use error::{SnapshotError, SnapshotResult};
pub use history::{Direction, History, HistoryEntry};
pub use runner::{MutationRunner, NoHooks, RunnerHooks, Transaction, UndoState};
pub use snapshot::{CaptureScope, DocumentImage, RestoreEffect, Snapshot};
