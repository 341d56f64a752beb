//! vartab Variant
//!
//! Enumerate every valid modifier combination of an entity.
//!
//! Responsibilities:
//! - Classify modifiers by per-entity state
//! - Expand each group's cardinality rule into choice lists
//! - Cartesian-product groups and ungrouped modifiers, outer group first
//! - Filter by constraints, canonicalize, deduplicate and cap

mod collector;
mod group;
mod signature;

pub use collector::{classify, Classification, VariantCollector, VariantSet};
pub use group::{group_combos, GroupCombos};
pub use signature::{canonicalize, Variant, SIGNATURE_SEP};
