//! vartab Core Types
//!
//! This crate provides the foundational records used throughout vartab:
//! - Identity types (ModifierId, EntityId, EventId, GroupId)
//! - Catalog records (Modifier, ModifierGroup, ModifierConstraint)
//! - Entity modifier-state and events
//! - Interaction pairs and canonical note keys
//! - The Document that owns all of the above
//! - Engine configuration and common error types

mod cleanup;
mod config;
mod document;
mod error;
mod id;
mod model;
mod note;
mod pair;

pub use cleanup::CleanupReport;
pub use config::EngineConfig;
pub use document::{Document, PairIndex};
pub use error::{CoreError, CoreResult};
pub use id::{EntityId, EventId, GroupId, ModifierId};
pub use model::{
    DualRelation, Entity, Event, GroupMode, Modifier, ModifierConstraint, ModifierGroup,
    ModifierState, TableMode,
};
pub use note::{Note, NoteKey};
pub use pair::{InteractionPair, PairKind, PairSide, PairTarget};
