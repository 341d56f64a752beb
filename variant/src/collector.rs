//! Per-entity variant enumeration.

use std::collections::{HashMap, HashSet};
use std::ops::ControlFlow;

use tracing::debug;
use vartab_constraint::{
    build_constraint_maps, violates_constraints, violates_exclusions, ConstraintMaps,
};
use vartab_core::{
    Document, EngineConfig, Entity, EntityId, GroupId, Modifier, ModifierGroup, ModifierId,
    ModifierState,
};

use crate::group::group_combos;
use crate::signature::{canonicalize, Variant};

/// An entity's modifiers split by state, each list in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// `REQUIRES`: present in every variant.
    pub required: Vec<ModifierId>,
    /// `ON`: offered to enumeration.
    pub optional: Vec<ModifierId>,
    /// `OFF` or `BYPASS`: never forced, never offered.
    pub excluded: Vec<ModifierId>,
}

/// Split catalog modifiers by the entity's state for each.
///
/// States recorded for ids no longer in the catalog are ignored.
pub fn classify(entity: &Entity, catalog: &[Modifier]) -> Classification {
    let mut classification = Classification::default();
    for modifier in catalog {
        match entity.state(modifier.id) {
            ModifierState::Requires => classification.required.push(modifier.id),
            ModifierState::On => classification.optional.push(modifier.id),
            ModifierState::Off | ModifierState::Bypass => {
                classification.excluded.push(modifier.id)
            }
        }
    }
    classification
}

/// Every valid variant of one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSet {
    pub entity_id: EntityId,
    /// Distinct variants in enumeration order.
    pub variants: Vec<Variant>,
    /// Enumeration stopped early: the variant cap was hit with more variants
    /// left, or the candidate budget ran out.
    pub capped: bool,
    /// The candidate budget ran out before the product was exhausted.
    pub budget_exhausted: bool,
    /// Partial and complete candidates visited.
    pub candidates_examined: usize,
    /// Groups whose own choice list hit the per-group cap.
    pub truncated_groups: Vec<GroupId>,
    /// Required groups with no valid branch for this entity.
    pub unsatisfiable_groups: Vec<GroupId>,
}

impl VariantSet {
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

/// Enumerates variants against one document's catalog, groups and rules.
pub struct VariantCollector<'d> {
    document: &'d Document,
    positions: HashMap<ModifierId, usize>,
    maps: ConstraintMaps,
    variant_cap: usize,
    candidate_budget: usize,
    group_cap: usize,
}

impl<'d> VariantCollector<'d> {
    /// Create a collector; constraint tables are built once here.
    pub fn new(document: &'d Document, config: &EngineConfig) -> Self {
        Self {
            document,
            positions: document.catalog_positions(),
            maps: build_constraint_maps(&document.constraints),
            variant_cap: config.variant_cap_per_action,
            candidate_budget: config.candidate_budget_per_action,
            group_cap: config.group_combo_cap,
        }
    }

    /// Groups with at least one member required or offered for this entity.
    fn touching_groups(&self, classification: &Classification) -> Vec<&'d ModifierGroup> {
        self.document
            .groups
            .iter()
            .filter(|g| {
                g.member_ids.iter().any(|id| {
                    classification.required.contains(id) || classification.optional.contains(id)
                })
            })
            .collect()
    }

    /// Enumerate the variants of `entity`.
    ///
    /// Choice lists are product-expanded with the first group as the
    /// outermost loop; ungrouped optional modifiers follow as independent
    /// absent/present choices in catalog order. Branches whose partial set
    /// already breaks a MUTEX or FORBIDS rule are skipped, and at most
    /// `candidate_budget_per_action` candidates are visited.
    pub fn collect(&self, entity: &Entity) -> VariantSet {
        let classification = classify(entity, &self.document.catalog);
        let groups = self.touching_groups(&classification);

        let mut set = VariantSet {
            entity_id: entity.id,
            variants: Vec::new(),
            capped: false,
            budget_exhausted: false,
            candidates_examined: 0,
            truncated_groups: Vec::new(),
            unsatisfiable_groups: Vec::new(),
        };

        let mut choice_lists: Vec<Vec<Vec<ModifierId>>> = Vec::new();
        for group in &groups {
            let combos = group_combos(
                group,
                &classification.required,
                &classification.optional,
                self.group_cap,
            );
            if combos.truncated {
                debug!(
                    entity = %entity.id,
                    group = %group.id,
                    mode = %group.mode.label(),
                    limit = ?combos.truncation_limit,
                    "group choices truncated"
                );
                set.truncated_groups.push(group.id);
            }
            if combos.is_unsatisfiable() {
                set.unsatisfiable_groups.push(group.id);
            }
            choice_lists.push(combos.items);
        }

        let grouped: HashSet<ModifierId> = groups
            .iter()
            .flat_map(|g| g.member_ids.iter().copied())
            .collect();
        for id in classification.optional.iter().filter(|id| !grouped.contains(id)) {
            choice_lists.push(vec![Vec::new(), vec![*id]]);
        }

        if !set.unsatisfiable_groups.is_empty() {
            debug!(
                entity = %entity.id,
                groups = ?set.unsatisfiable_groups,
                "required group unsatisfiable; entity has no variants"
            );
            return set;
        }

        let mut walk = Walk {
            lists: &choice_lists,
            maps: &self.maps,
            positions: &self.positions,
            variant_cap: self.variant_cap,
            budget: self.candidate_budget.max(1),
            seen: HashSet::new(),
            set,
        };
        let mut candidate = classification.required.clone();
        let _ = walk.descend(0, &mut candidate);
        let set = walk.set;

        debug!(
            entity = %entity.id,
            variants = set.variants.len(),
            examined = set.candidates_examined,
            capped = set.capped,
            "collected variants"
        );
        set
    }

    /// Variant sets for every entity, in document order.
    pub fn collect_all(&self) -> Vec<VariantSet> {
        self.document
            .entities
            .iter()
            .map(|entity| self.collect(entity))
            .collect()
    }
}

/// Depth-first product over choice lists, last list fastest.
struct Walk<'a> {
    lists: &'a [Vec<Vec<ModifierId>>],
    maps: &'a ConstraintMaps,
    positions: &'a HashMap<ModifierId, usize>,
    variant_cap: usize,
    budget: usize,
    seen: HashSet<String>,
    set: VariantSet,
}

impl Walk<'_> {
    fn descend(&mut self, depth: usize, candidate: &mut Vec<ModifierId>) -> ControlFlow<()> {
        if self.set.candidates_examined == self.budget {
            self.set.capped = true;
            self.set.budget_exhausted = true;
            return ControlFlow::Break(());
        }
        self.set.candidates_examined += 1;

        // Presence rules only grow more violated as ids are added.
        if violates_exclusions(candidate, self.maps) {
            return ControlFlow::Continue(());
        }
        if depth == self.lists.len() {
            return self.accept(candidate);
        }

        let lists = self.lists;
        for choice in &lists[depth] {
            let len = candidate.len();
            candidate.extend_from_slice(choice);
            let flow = self.descend(depth + 1, candidate);
            candidate.truncate(len);
            if flow.is_break() {
                return flow;
            }
        }
        ControlFlow::Continue(())
    }

    fn accept(&mut self, candidate: &[ModifierId]) -> ControlFlow<()> {
        let variant = canonicalize(candidate, self.positions);
        if violates_constraints(&variant.modifier_ids, self.maps) || self.seen.contains(&variant.key)
        {
            return ControlFlow::Continue(());
        }
        if self.set.variants.len() == self.variant_cap {
            self.set.capped = true;
            return ControlFlow::Break(());
        }
        self.seen.insert(variant.key.clone());
        self.set.variants.push(variant);
        ControlFlow::Continue(())
    }
}
