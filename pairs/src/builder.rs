//! Interaction table rebuild.

use std::collections::BTreeSet;

use tracing::debug;
use vartab_core::{
    Document, EngineConfig, EntityId, GroupId, InteractionPair, NoteKey, PairIndex, PairKind,
    PairSide, PairTarget, TableMode,
};
use vartab_variant::{Variant, VariantCollector, VariantSet};

/// Summary of one rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildStats {
    pub entity_count: usize,
    pub event_count: usize,
    pub pair_count: usize,
    /// Any entity hit the per-entity variant cap.
    pub capped: bool,
    pub capped_entities: Vec<EntityId>,
    /// Groups that hit the per-group cap for at least one entity.
    pub truncated_groups: Vec<GroupId>,
}

fn side(entity_id: EntityId, variant: &Variant) -> PairSide {
    PairSide {
        entity_id,
        modifier_ids: variant.modifier_ids.clone(),
        signature: variant.signature.clone(),
        variant_key: variant.key.clone(),
    }
}

fn cross_pairs(sets: &[VariantSet], document: &Document) -> Vec<InteractionPair> {
    let mut pairs = Vec::new();
    for set in sets {
        for variant in &set.variants {
            for event in &document.events {
                pairs.push(InteractionPair {
                    kind: PairKind::Cross,
                    left: side(set.entity_id, variant),
                    right: PairTarget::Event(event.id),
                    key: NoteKey::cross(set.entity_id, &variant.key, event.id),
                });
            }
        }
    }
    pairs
}

/// Ordered product over distinct entities: (X, Y) and (Y, X) are both rows.
fn self_pairs(sets: &[VariantSet]) -> Vec<InteractionPair> {
    let mut pairs = Vec::new();
    for (i, left_set) in sets.iter().enumerate() {
        for left in &left_set.variants {
            for (j, right_set) in sets.iter().enumerate() {
                if i == j {
                    continue;
                }
                for right in &right_set.variants {
                    pairs.push(InteractionPair {
                        kind: PairKind::SelfPair,
                        left: side(left_set.entity_id, left),
                        right: PairTarget::Entity(side(right_set.entity_id, right)),
                        key: NoteKey::self_pair(
                            left_set.entity_id,
                            &left.key,
                            right_set.entity_id,
                            &right.key,
                        ),
                    });
                }
            }
        }
    }
    pairs
}

/// Rebuild the pair table and index from scratch.
///
/// The previous table is replaced wholesale; notes are not touched (see
/// [`crate::prune_notes`]).
pub fn rebuild_pairs(document: &mut Document, config: &EngineConfig) -> RebuildStats {
    let sets = VariantCollector::new(document, config).collect_all();

    let pairs = match document.mode {
        TableMode::Cross => cross_pairs(&sets, document),
        TableMode::SelfPairs => self_pairs(&sets),
    };

    let mut index = PairIndex::with_capacity(pairs.len());
    for (i, pair) in pairs.iter().enumerate() {
        index.entry(pair.key.clone()).or_insert(i);
    }

    let capped_entities: Vec<EntityId> = sets
        .iter()
        .filter(|s| s.capped)
        .map(|s| s.entity_id)
        .collect();
    let truncated_groups: BTreeSet<GroupId> = sets
        .iter()
        .flat_map(|s| s.truncated_groups.iter().copied())
        .collect();

    let stats = RebuildStats {
        entity_count: document.entities.len(),
        event_count: document.events.len(),
        pair_count: pairs.len(),
        capped: !capped_entities.is_empty(),
        capped_entities,
        truncated_groups: truncated_groups.into_iter().collect(),
    };

    document.pairs = pairs;
    document.pair_index = index;

    debug!(
        mode = ?document.mode,
        entities = stats.entity_count,
        events = stats.event_count,
        pairs = stats.pair_count,
        capped = stats.capped,
        "rebuilt interaction table"
    );
    stats
}
