//! Canonical note keys and note payloads.
//!
//! A note is addressed by the identity of the pair it annotates, never by
//! the row it currently sits on. Key grammar:
//!
//! - cross: `E<entity>[<variant key>]@V<event>`
//! - self:  `E<left>[<variant key>]~E<right>[<variant key>]`
//! - either form may carry a phase suffix `#<phase>`

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{EntityId, EventId};

const PHASE_SEP: char = '#';
const SELF_SEP: char = '~';

/// Canonical identity of an annotated pair, optionally scoped to a phase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteKey(String);

impl NoteKey {
    /// Key for an entity variant against an event.
    pub fn cross(entity: EntityId, variant_key: &str, event: EventId) -> Self {
        Self(format!("{}[{}]@{}", entity, variant_key, event))
    }

    /// Key for an ordered pair of entity variants.
    pub fn self_pair(
        left: EntityId,
        left_key: &str,
        right: EntityId,
        right_key: &str,
    ) -> Self {
        Self(format!(
            "{}[{}]{}{}[{}]",
            left, left_key, SELF_SEP, right, right_key
        ))
    }

    /// Wrap an already-formatted key.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The same pair, scoped to `phase`. Any existing phase is replaced.
    pub fn with_phase(&self, phase: &str) -> Self {
        Self(format!("{}{}{}", self.base().0, PHASE_SEP, phase))
    }

    /// The pair identity without a phase suffix.
    pub fn base(&self) -> NoteKey {
        match self.0.split_once(PHASE_SEP) {
            Some((base, _)) => NoteKey(base.to_string()),
            None => self.clone(),
        }
    }

    pub fn phase(&self) -> Option<&str> {
        self.0.split_once(PHASE_SEP).map(|(_, phase)| phase)
    }

    pub fn is_self_pair(&self) -> bool {
        self.base().0.contains(SELF_SEP)
    }

    /// Swap the two sides of a self-mode key, keeping the phase.
    ///
    /// Returns `None` for cross-mode keys.
    pub fn mirrored(&self) -> Option<NoteKey> {
        let base = self.base();
        let (left, right) = base.0.split_once(SELF_SEP)?;
        let mirrored = NoteKey(format!("{}{}{}", right, SELF_SEP, left));
        Some(match self.phase() {
            Some(phase) => mirrored.with_phase(phase),
            None => mirrored,
        })
    }
}

impl fmt::Display for NoteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Payload stored against a note key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Note {
    /// Outcome value; mirrored through the dual relation at the dual phase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    /// Free text.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
}

impl Note {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            outcome: None,
            text: text.into(),
        }
    }

    pub fn outcome(outcome: impl Into<String>) -> Self {
        Self {
            outcome: Some(outcome.into()),
            text: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.outcome.is_none() && self.text.is_empty()
    }
}
