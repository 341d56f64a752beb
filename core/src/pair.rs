//! Rows of the materialized interaction table.

use crate::{EntityId, EventId, ModifierId, NoteKey};

/// One entity variant as it appears on a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairSide {
    pub entity_id: EntityId,
    /// Member ids in catalog order.
    pub modifier_ids: Vec<ModifierId>,
    /// Display signature (catalog order).
    pub signature: String,
    /// Canonical variant key (id order); feeds the note key.
    pub variant_key: String,
}

/// Right-hand side of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairTarget {
    Event(EventId),
    Entity(PairSide),
}

/// Orientation a row was produced by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairKind {
    Cross,
    SelfPair,
}

/// A row of the interaction table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionPair {
    pub kind: PairKind,
    pub left: PairSide,
    pub right: PairTarget,
    /// Canonical note key of this row (no phase).
    pub key: NoteKey,
}

impl InteractionPair {
    pub fn event_id(&self) -> Option<EventId> {
        match &self.right {
            PairTarget::Event(id) => Some(*id),
            PairTarget::Entity(_) => None,
        }
    }

    pub fn right_side(&self) -> Option<&PairSide> {
        match &self.right {
            PairTarget::Event(_) => None,
            PairTarget::Entity(side) => Some(side),
        }
    }
}
