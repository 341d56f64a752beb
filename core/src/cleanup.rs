//! Dangling-id cleanup after modifiers leave the catalog.

use std::collections::HashSet;

use crate::{Document, ModifierConstraint, ModifierId};

/// What a cleanup pass removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Group member references dropped.
    pub group_members_removed: usize,
    /// Entity state entries dropped.
    pub entity_states_removed: usize,
    /// Constraints dropped entirely.
    pub constraints_removed: usize,
    /// MUTEX lists that lost members but survived.
    pub constraints_trimmed: usize,
}

impl CleanupReport {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Document {
    /// Drop every reference to a modifier id that is no longer in the catalog.
    ///
    /// REQUIRES/FORBIDS rules naming a missing id are removed; MUTEX lists are
    /// filtered and removed once fewer than two ids remain. Running the pass
    /// twice is a no-op the second time.
    pub fn cleanup_dangling_ids(&mut self) -> CleanupReport {
        let live: HashSet<ModifierId> = self.catalog.iter().map(|m| m.id).collect();
        let mut report = CleanupReport::default();

        for group in &mut self.groups {
            let before = group.member_ids.len();
            group.member_ids.retain(|id| live.contains(id));
            report.group_members_removed += before - group.member_ids.len();
        }

        for entity in &mut self.entities {
            let before = entity.modifier_states.len();
            entity.modifier_states.retain(|id, _| live.contains(id));
            report.entity_states_removed += before - entity.modifier_states.len();
        }

        let mut kept = Vec::with_capacity(self.constraints.len());
        for constraint in self.constraints.drain(..) {
            match constraint {
                ModifierConstraint::Requires { a, b } | ModifierConstraint::Forbids { a, b }
                    if !live.contains(&a) || !live.contains(&b) =>
                {
                    report.constraints_removed += 1;
                }
                ModifierConstraint::Mutex { ids } => {
                    let before = ids.len();
                    let ids: Vec<_> = ids.into_iter().filter(|id| live.contains(id)).collect();
                    if ids.len() < 2 {
                        report.constraints_removed += 1;
                    } else {
                        if ids.len() != before {
                            report.constraints_trimmed += 1;
                        }
                        kept.push(ModifierConstraint::Mutex { ids });
                    }
                }
                other => kept.push(other),
            }
        }
        self.constraints = kept;

        report
    }
}
