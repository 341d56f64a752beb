//! vartab Constraint
//!
//! Check candidate modifier sets against compatibility rules.
//!
//! Responsibilities:
//! - Build immutable lookup tables from REQUIRES/FORBIDS/MUTEX records
//! - Expand n-ary MUTEX lists into pairwise keys
//! - Answer "does this set violate anything" cheaply
//! - Explain which rules a set breaks

mod maps;
mod violation;

pub use maps::{build_constraint_maps, violates_constraints, violates_exclusions, ConstraintMaps};
pub use violation::{explain_violations, Violation, ViolationKind};
