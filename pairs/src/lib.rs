//! vartab Pairs
//!
//! Materialize the interaction table and keep notes attached to it.
//!
//! Responsibilities:
//! - Cross-product entity variants with events (cross mode)
//! - Ordered, mirrored product of entity variants (self mode)
//! - Rebuild the table and its key index wholesale
//! - Address notes by canonical pair identity
//! - Mirror dual outcomes across swapped self-mode rows
//! - Prune notes whose pair no longer exists

mod builder;
mod error;
mod notes;

pub use builder::{rebuild_pairs, RebuildStats};
pub use error::{PairError, PairResult};
pub use notes::{clear_note, note, prune_notes, set_note};
