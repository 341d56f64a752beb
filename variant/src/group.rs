//! Per-group choice lists.

use vartab_combinator::{range_combos, Combos};
use vartab_core::{GroupMode, ModifierGroup, ModifierId};

/// Optional-member choices a group allows for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCombos {
    /// Optional members chosen in each branch. Required members are implied.
    pub items: Vec<Vec<ModifierId>>,
    pub truncated: bool,
    pub truncation_limit: Option<usize>,
    /// Group members in the entity's required set.
    pub required_count: usize,
    /// Group members in the entity's optional set.
    pub optional_count: usize,
    pub total_members: usize,
}

impl GroupCombos {
    /// A required group with no valid branch.
    pub fn is_unsatisfiable(&self) -> bool {
        self.items.is_empty()
    }
}

/// Expand one group's cardinality rule for an entity.
///
/// `required` and `optional` are the entity's classified ids; only group
/// members are considered. A group that is not required always offers the
/// empty choice, first. A required group that cannot be satisfied yields
/// no items.
pub fn group_combos(
    group: &ModifierGroup,
    required: &[ModifierId],
    optional: &[ModifierId],
    cap: usize,
) -> GroupCombos {
    let required_count = required.iter().filter(|id| group.contains(**id)).count();
    let optional_members: Vec<ModifierId> = optional
        .iter()
        .copied()
        .filter(|id| group.contains(*id))
        .collect();
    let optional_count = optional_members.len();
    let rc = required_count;
    let oc = optional_count;

    let combos = match group.mode {
        GroupMode::Exact { k } => {
            if k < rc || k - rc > oc {
                Combos::empty()
            } else {
                range_combos(&optional_members, k - rc, k - rc, cap)
            }
        }
        GroupMode::AtLeast { k } => {
            let min_pick = k.saturating_sub(rc);
            if min_pick > oc {
                Combos::empty()
            } else {
                range_combos(&optional_members, min_pick, oc, cap)
            }
        }
        GroupMode::AtMost { k } => {
            if rc > k {
                Combos::empty()
            } else {
                range_combos(&optional_members, 0, oc.min(k - rc), cap)
            }
        }
        GroupMode::Range { k_min, k_max } => {
            if rc > k_max {
                Combos::empty()
            } else {
                let min_pick = k_min.saturating_sub(rc);
                let max_pick = min_pick.max(oc.min(k_max - rc));
                if min_pick > oc {
                    Combos::empty()
                } else {
                    range_combos(&optional_members, min_pick, max_pick, cap)
                }
            }
        }
    };

    let Combos {
        mut items,
        mut truncated,
        mut truncation_limit,
    } = combos;

    if !group.required && !items.iter().any(Vec::is_empty) {
        items.insert(0, Vec::new());
        if items.len() > cap.max(1) {
            items.pop();
            truncated = true;
            truncation_limit = Some(cap.max(1));
        }
    }

    GroupCombos {
        items,
        truncated,
        truncation_limit,
        required_count,
        optional_count,
        total_members: group.member_ids.len(),
    }
}
