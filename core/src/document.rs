//! The document: everything the engine reads and the only thing it writes.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::{
    DualRelation, Entity, EntityId, Event, EventId, GroupId, InteractionPair, Modifier,
    ModifierConstraint, ModifierGroup, ModifierId, ModifierState, Note, NoteKey, TableMode,
};

/// Lookup from a row's canonical note key to its position in the table.
pub type PairIndex = HashMap<NoteKey, usize>;

/// Authoritative editable state plus the derived interaction table.
///
/// `pairs` and `pair_index` are derived: they are never persisted and are
/// rebuilt wholesale from the rest of the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Modifier catalog; row order defines canonical variant order.
    #[serde(default)]
    pub catalog: Vec<Modifier>,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub groups: Vec<ModifierGroup>,
    #[serde(default)]
    pub constraints: Vec<ModifierConstraint>,
    #[serde(default)]
    pub mode: TableMode,
    #[serde(default)]
    pub dual: DualRelation,
    #[serde(default)]
    pub notes: BTreeMap<NoteKey, Note>,
    #[serde(skip)]
    pub pairs: Vec<InteractionPair>,
    #[serde(skip)]
    pub pair_index: PairIndex,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Catalog ==========

    /// Catalog row of a modifier.
    pub fn catalog_position(&self, id: ModifierId) -> Option<usize> {
        self.catalog.iter().position(|m| m.id == id)
    }

    /// Map of every catalog id to its row.
    pub fn catalog_positions(&self) -> HashMap<ModifierId, usize> {
        self.catalog
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id, i))
            .collect()
    }

    pub fn modifier(&self, id: ModifierId) -> Option<&Modifier> {
        self.catalog.iter().find(|m| m.id == id)
    }

    pub fn has_modifier(&self, id: ModifierId) -> bool {
        self.catalog_position(id).is_some()
    }

    pub fn next_modifier_id(&self) -> ModifierId {
        ModifierId::new(self.catalog.iter().map(|m| m.id.raw()).max().map_or(1, |m| m + 1))
    }

    pub fn add_modifier(&mut self, modifier: Modifier) -> CoreResult<()> {
        if self.has_modifier(modifier.id) {
            return Err(CoreError::duplicate(format!("modifier {}", modifier.id)));
        }
        self.catalog.push(modifier);
        Ok(())
    }

    /// Remove a modifier from the catalog only.
    ///
    /// References in groups, constraints and entity states are left in
    /// place; see [`Document::cleanup_dangling_ids`].
    pub fn remove_modifier(&mut self, id: ModifierId) -> CoreResult<Modifier> {
        let pos = self
            .catalog_position(id)
            .ok_or(CoreError::ModifierNotFound(id))?;
        Ok(self.catalog.remove(pos))
    }

    /// Reorder the catalog. `order` must name every modifier exactly once.
    pub fn reorder_catalog(&mut self, order: &[ModifierId]) -> CoreResult<()> {
        if order.len() != self.catalog.len() {
            return Err(CoreError::invalid_order(format!(
                "expected {} ids, got {}",
                self.catalog.len(),
                order.len()
            )));
        }

        let mut seen = HashSet::new();
        let mut reordered = Vec::with_capacity(order.len());
        for id in order {
            if !seen.insert(*id) {
                return Err(CoreError::invalid_order(format!("{} listed twice", id)));
            }
            let modifier = self.modifier(*id).ok_or(CoreError::ModifierNotFound(*id))?;
            reordered.push(modifier.clone());
        }

        self.catalog = reordered;
        Ok(())
    }

    // ========== Entities and events ==========

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> CoreResult<&mut Entity> {
        self.entities
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(CoreError::EntityNotFound(id))
    }

    pub fn next_entity_id(&self) -> EntityId {
        EntityId::new(self.entities.iter().map(|e| e.id.raw()).max().map_or(1, |m| m + 1))
    }

    pub fn add_entity(&mut self, entity: Entity) -> CoreResult<()> {
        if self.entity(entity.id).is_some() {
            return Err(CoreError::duplicate(entity.id));
        }
        self.entities.push(entity);
        Ok(())
    }

    pub fn remove_entity(&mut self, id: EntityId) -> CoreResult<Entity> {
        let pos = self
            .entities
            .iter()
            .position(|e| e.id == id)
            .ok_or(CoreError::EntityNotFound(id))?;
        Ok(self.entities.remove(pos))
    }

    pub fn set_modifier_state(
        &mut self,
        entity: EntityId,
        modifier: ModifierId,
        state: ModifierState,
    ) -> CoreResult<()> {
        if !self.has_modifier(modifier) {
            return Err(CoreError::ModifierNotFound(modifier));
        }
        self.entity_mut(entity)?.set_state(modifier, state);
        Ok(())
    }

    pub fn event(&self, id: EventId) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn next_event_id(&self) -> EventId {
        EventId::new(self.events.iter().map(|e| e.id.raw()).max().map_or(1, |m| m + 1))
    }

    pub fn add_event(&mut self, event: Event) -> CoreResult<()> {
        if self.event(event.id).is_some() {
            return Err(CoreError::duplicate(event.id));
        }
        self.events.push(event);
        Ok(())
    }

    pub fn remove_event(&mut self, id: EventId) -> CoreResult<Event> {
        let pos = self
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or(CoreError::EventNotFound(id))?;
        Ok(self.events.remove(pos))
    }

    // ========== Rules ==========

    pub fn group(&self, id: GroupId) -> Option<&ModifierGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn next_group_id(&self) -> GroupId {
        GroupId::new(self.groups.iter().map(|g| g.id.raw()).max().map_or(1, |m| m + 1))
    }

    /// Add a validated group.
    pub fn add_group(&mut self, group: ModifierGroup) -> CoreResult<()> {
        group.validate()?;
        if self.group(group.id).is_some() {
            return Err(CoreError::duplicate(group.id));
        }
        self.groups.push(group);
        Ok(())
    }

    pub fn remove_group(&mut self, id: GroupId) -> CoreResult<ModifierGroup> {
        let pos = self
            .groups
            .iter()
            .position(|g| g.id == id)
            .ok_or(CoreError::GroupNotFound(id))?;
        Ok(self.groups.remove(pos))
    }

    pub fn add_constraint(&mut self, constraint: ModifierConstraint) {
        self.constraints.push(constraint);
    }

    /// Remove the constraint at `index`, if any.
    pub fn remove_constraint(&mut self, index: usize) -> Option<ModifierConstraint> {
        (index < self.constraints.len()).then(|| self.constraints.remove(index))
    }

    // ========== Derived table ==========

    /// Row addressed by a canonical key (phase suffix ignored).
    pub fn pair(&self, key: &NoteKey) -> Option<&InteractionPair> {
        self.pair_index
            .get(&key.base())
            .and_then(|&i| self.pairs.get(i))
    }

    pub fn clear_derived(&mut self) {
        self.pairs.clear();
        self.pair_index.clear();
    }
}
