//! Variant identity.
//!
//! A variant has two spellings. The display `signature` follows catalog
//! order and changes when the catalog is reordered. The canonical `key`
//! follows id order and never does; it is what note keys are built from.

use std::collections::HashMap;

use vartab_core::ModifierId;

/// Separator between ids in signatures and keys.
pub const SIGNATURE_SEP: char = '+';

/// One concrete modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variant {
    /// Distinct member ids in catalog order.
    pub modifier_ids: Vec<ModifierId>,
    /// Catalog-order `+`-joined ids. Empty for the base variant.
    pub signature: String,
    /// Id-order `+`-joined ids.
    pub key: String,
}

impl Variant {
    /// The variant with no modifiers.
    pub fn base() -> Self {
        Self {
            modifier_ids: Vec::new(),
            signature: String::new(),
            key: String::new(),
        }
    }

    pub fn is_base(&self) -> bool {
        self.modifier_ids.is_empty()
    }

    pub fn contains(&self, id: ModifierId) -> bool {
        self.modifier_ids.contains(&id)
    }
}

fn join(ids: &[ModifierId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(&SIGNATURE_SEP.to_string())
}

/// Build the canonical form of an id collection.
///
/// Input order and duplicates do not matter. Ids missing from `positions`
/// sort after every catalog id, by id.
pub fn canonicalize(ids: &[ModifierId], positions: &HashMap<ModifierId, usize>) -> Variant {
    let mut by_id = ids.to_vec();
    by_id.sort();
    by_id.dedup();

    let mut by_catalog = by_id.clone();
    by_catalog.sort_by_key(|id| (positions.get(id).copied().unwrap_or(usize::MAX), *id));

    Variant {
        signature: join(&by_catalog),
        key: join(&by_id),
        modifier_ids: by_catalog,
    }
}
