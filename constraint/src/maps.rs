//! Constraint lookup tables.

use std::collections::{HashMap, HashSet};

use vartab_core::{ModifierConstraint, ModifierId};

/// Immutable lookup tables built from a constraint list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintMaps {
    requires: HashMap<ModifierId, HashSet<ModifierId>>,
    forbids: HashMap<ModifierId, HashSet<ModifierId>>,
    mutex: HashSet<(ModifierId, ModifierId)>,
}

impl ConstraintMaps {
    /// Ids that must be present whenever `id` is.
    pub fn requires_of(&self, id: ModifierId) -> Option<&HashSet<ModifierId>> {
        self.requires.get(&id)
    }

    /// Ids that must be absent whenever `id` is.
    pub fn forbids_of(&self, id: ModifierId) -> Option<&HashSet<ModifierId>> {
        self.forbids.get(&id)
    }

    /// Whether `a` and `b` are declared mutually exclusive (order-insensitive).
    pub fn is_mutex(&self, a: ModifierId, b: ModifierId) -> bool {
        self.mutex.contains(&mutex_key(a, b))
    }

    pub fn mutex_pair_count(&self) -> usize {
        self.mutex.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requires.is_empty() && self.forbids.is_empty() && self.mutex.is_empty()
    }
}

/// Normalized key for an unordered pair.
pub(crate) fn mutex_key(a: ModifierId, b: ModifierId) -> (ModifierId, ModifierId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Build lookup tables. MUTEX lists expand to every pair they contain.
pub fn build_constraint_maps(constraints: &[ModifierConstraint]) -> ConstraintMaps {
    let mut maps = ConstraintMaps::default();

    for constraint in constraints {
        match constraint {
            ModifierConstraint::Requires { a, b } => {
                maps.requires.entry(*a).or_default().insert(*b);
            }
            ModifierConstraint::Forbids { a, b } => {
                maps.forbids.entry(*a).or_default().insert(*b);
            }
            ModifierConstraint::Mutex { ids } => {
                for (i, a) in ids.iter().enumerate() {
                    for b in &ids[i + 1..] {
                        if a != b {
                            maps.mutex.insert(mutex_key(*a, *b));
                        }
                    }
                }
            }
        }
    }

    maps
}

/// True iff the candidate set breaks any rule.
///
/// A set violates when a mutex pair is fully present, a present id's
/// forbidden target is present, or a present id's required target is absent.
pub fn violates_constraints(candidate: &[ModifierId], maps: &ConstraintMaps) -> bool {
    if maps.is_empty() {
        return false;
    }

    if violates_exclusions(candidate, maps) {
        return true;
    }

    for &a in candidate {
        if let Some(required) = maps.requires_of(a) {
            if required.iter().any(|r| !candidate.contains(r)) {
                return true;
            }
        }
    }

    false
}

/// True iff a MUTEX pair or FORBIDS target is fully present.
///
/// Only presence rules are checked, so a set that violates here also
/// violates with any ids added to it.
pub fn violates_exclusions(candidate: &[ModifierId], maps: &ConstraintMaps) -> bool {
    if maps.mutex.is_empty() && maps.forbids.is_empty() {
        return false;
    }

    for (i, &a) in candidate.iter().enumerate() {
        for &b in &candidate[i + 1..] {
            if maps.is_mutex(a, b) {
                return true;
            }
        }

        if let Some(forbidden) = maps.forbids_of(a) {
            if candidate.iter().any(|c| *c != a && forbidden.contains(c)) {
                return true;
            }
        }
    }

    false
}
