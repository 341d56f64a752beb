//! Catalog, group, constraint and entity records.
//!
//! These are plain data as authored by the rules-editing side of the
//! tool. Field names follow the persisted JSON shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::{EntityId, EventId, GroupId, ModifierId};

/// A modifier row in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    pub id: ModifierId,
    pub name: String,
}

impl Modifier {
    pub fn new(id: ModifierId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Per-entity state of one modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModifierState {
    /// Not applicable to this entity.
    #[default]
    Off,
    /// Optional: offered to enumeration.
    On,
    /// Disabled for this entity: never forced, never offered.
    Bypass,
    /// Mandatory in every variant of this entity.
    Requires,
}

/// Cardinality rule over a group's members.
///
/// Each mode carries only the bounds it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupMode {
    /// Exactly `k` members chosen.
    Exact { k: usize },
    /// At least `k` members chosen.
    AtLeast { k: usize },
    /// At most `k` members chosen.
    AtMost { k: usize },
    /// Between `k_min` and `k_max` members chosen (inclusive).
    Range {
        #[serde(rename = "kMin")]
        k_min: usize,
        #[serde(rename = "kMax")]
        k_max: usize,
    },
}

impl GroupMode {
    /// Short label used in diagnostics.
    pub fn label(&self) -> String {
        match self {
            GroupMode::Exact { k } => format!("EXACT {}", k),
            GroupMode::AtLeast { k } => format!("AT_LEAST {}", k),
            GroupMode::AtMost { k } => format!("AT_MOST {}", k),
            GroupMode::Range { k_min, k_max } => format!("RANGE {}..={}", k_min, k_max),
        }
    }
}

/// A cardinality constraint over a set of modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierGroup {
    pub id: GroupId,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub mode: GroupMode,
    #[serde(default)]
    pub required: bool,
    pub member_ids: Vec<ModifierId>,
}

impl ModifierGroup {
    pub fn new(id: GroupId, name: impl Into<String>, mode: GroupMode) -> Self {
        Self {
            id,
            name: name.into(),
            mode,
            required: false,
            member_ids: Vec::new(),
        }
    }

    /// Mark the group as required (it must be engaged in every variant).
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_members(mut self, members: impl IntoIterator<Item = ModifierId>) -> Self {
        self.member_ids = members.into_iter().collect();
        self
    }

    pub fn contains(&self, id: ModifierId) -> bool {
        self.member_ids.contains(&id)
    }

    /// Reject structurally broken records.
    ///
    /// Unsatisfiable-but-well-formed groups are accepted; they simply
    /// enumerate nothing.
    pub fn validate(&self) -> CoreResult<()> {
        if let GroupMode::Range { k_min, k_max } = self.mode {
            if k_min > k_max {
                return Err(CoreError::invalid_group(
                    self.id,
                    format!("kMin {} exceeds kMax {}", k_min, k_max),
                ));
            }
        }

        for (i, id) in self.member_ids.iter().enumerate() {
            if self.member_ids[..i].contains(id) {
                return Err(CoreError::invalid_group(
                    self.id,
                    format!("duplicate member {}", id),
                ));
            }
        }

        Ok(())
    }
}

/// Compatibility rule between modifiers, independent of groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModifierConstraint {
    /// If `a` is present, `b` must be present.
    Requires { a: ModifierId, b: ModifierId },
    /// If `a` is present, `b` must be absent.
    Forbids { a: ModifierId, b: ModifierId },
    /// No two of `ids` may be present together.
    Mutex { ids: Vec<ModifierId> },
}

impl ModifierConstraint {
    pub fn requires(a: ModifierId, b: ModifierId) -> Self {
        Self::Requires { a, b }
    }

    pub fn forbids(a: ModifierId, b: ModifierId) -> Self {
        Self::Forbids { a, b }
    }

    pub fn mutex(ids: impl IntoIterator<Item = ModifierId>) -> Self {
        Self::Mutex {
            ids: ids.into_iter().collect(),
        }
    }

    /// All modifier ids this rule mentions.
    pub fn mentioned_ids(&self) -> Vec<ModifierId> {
        match self {
            ModifierConstraint::Requires { a, b } | ModifierConstraint::Forbids { a, b } => {
                vec![*a, *b]
            }
            ModifierConstraint::Mutex { ids } => ids.clone(),
        }
    }

    pub fn mentions(&self, id: ModifierId) -> bool {
        self.mentioned_ids().contains(&id)
    }
}

/// An entity carrying modifiers (one row family of the table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub modifier_states: BTreeMap<ModifierId, ModifierState>,
}

impl Entity {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            modifier_states: BTreeMap::new(),
        }
    }

    pub fn with_state(mut self, id: ModifierId, state: ModifierState) -> Self {
        self.set_state(id, state);
        self
    }

    /// State of a modifier for this entity; unset ids are `Off`.
    pub fn state(&self, id: ModifierId) -> ModifierState {
        self.modifier_states.get(&id).copied().unwrap_or_default()
    }

    /// Set a modifier state. Setting `Off` removes the entry.
    pub fn set_state(&mut self, id: ModifierId, state: ModifierState) {
        if state == ModifierState::Off {
            self.modifier_states.remove(&id);
        } else {
            self.modifier_states.insert(id, state);
        }
    }
}

/// A column of the cross-mode table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
}

impl Event {
    pub fn new(id: EventId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Orientation of the interaction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableMode {
    /// Entity variants against events.
    #[default]
    Cross,
    /// Entity variants against other entities' variants, ordered and mirrored.
    #[serde(rename = "self")]
    SelfPairs,
}

/// Symmetric map of outcome values used to mirror self-mode notes.
///
/// Values without a declared dual mirror to themselves.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DualRelation {
    duals: BTreeMap<String, String>,
}

impl DualRelation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `a` and `b` as each other's dual.
    pub fn with_pair(mut self, a: impl Into<String>, b: impl Into<String>) -> Self {
        self.insert(a, b);
        self
    }

    pub fn insert(&mut self, a: impl Into<String>, b: impl Into<String>) {
        let (a, b) = (a.into(), b.into());
        self.duals.insert(a.clone(), b.clone());
        self.duals.insert(b, a);
    }

    pub fn dual_of(&self, value: &str) -> String {
        self.duals
            .get(value)
            .cloned()
            .unwrap_or_else(|| value.to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.duals.is_empty()
    }
}
