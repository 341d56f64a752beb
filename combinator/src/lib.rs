//! vartab Combinator
//!
//! Enumerate subsets of an ordered list.
//!
//! Responsibilities:
//! - All size-k subsets in lexicographic index order
//! - Concatenated size ranges under a hard cap
//! - Report truncation instead of dropping silently

mod combos;

pub use combos::{k_combos, range_combos, Combos};
