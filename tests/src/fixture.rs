//! Declarative document fixtures.

use vartab_core::{
    Document, DualRelation, EngineConfig, Entity, EntityId, Event, GroupId, GroupMode,
    Modifier, ModifierConstraint, ModifierGroup, ModifierId, ModifierState, TableMode,
};
use vartab_pairs::{rebuild_pairs, RebuildStats};

/// Builds a [`Document`] from raw ids.
///
/// Records are pushed as given, without validation, so fixtures can also
/// describe malformed configurations.
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    document: Document,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog rows with ids 1..=n, in the given order.
    pub fn modifiers(mut self, names: &[&str]) -> Self {
        for name in names {
            let id = self.document.next_modifier_id();
            self.document.catalog.push(Modifier::new(id, *name));
        }
        self
    }

    pub fn modifier(mut self, id: u64, name: &str) -> Self {
        self.document
            .catalog
            .push(Modifier::new(ModifierId::new(id), name));
        self
    }

    /// An entity with every modifier OFF.
    pub fn entity(self, id: u64, name: &str) -> Self {
        self.entity_with(id, name, &[])
    }

    pub fn entity_with(mut self, id: u64, name: &str, states: &[(u64, ModifierState)]) -> Self {
        let mut entity = Entity::new(EntityId::new(id), name);
        for (modifier, state) in states {
            entity.set_state(ModifierId::new(*modifier), *state);
        }
        self.document.entities.push(entity);
        self
    }

    /// `count` entities named `e1`, `e2`, ...
    pub fn entities(mut self, count: u64) -> Self {
        for _ in 0..count {
            let id = self.document.next_entity_id();
            self.document
                .entities
                .push(Entity::new(id, format!("e{}", id.raw())));
        }
        self
    }

    /// Set `state` for `modifiers` on every entity added so far.
    pub fn all_entities(mut self, modifiers: &[u64], state: ModifierState) -> Self {
        for entity in &mut self.document.entities {
            for modifier in modifiers {
                entity.set_state(ModifierId::new(*modifier), state);
            }
        }
        self
    }

    /// Events with ids following the last one.
    pub fn events(mut self, names: &[&str]) -> Self {
        for name in names {
            let id = self.document.next_event_id();
            self.document.events.push(Event::new(id, *name));
        }
        self
    }

    pub fn group(mut self, id: u64, mode: GroupMode, required: bool, members: &[u64]) -> Self {
        self.document.groups.push(
            ModifierGroup::new(GroupId::new(id), format!("g{}", id), mode)
                .required(required)
                .with_members(members.iter().copied().map(ModifierId::new)),
        );
        self
    }

    pub fn constraint(mut self, constraint: ModifierConstraint) -> Self {
        self.document.constraints.push(constraint);
        self
    }

    pub fn mode(mut self, mode: TableMode) -> Self {
        self.document.mode = mode;
        self
    }

    /// Declare `a` and `b` as dual outcomes.
    pub fn dual(mut self, a: &str, b: &str) -> Self {
        self.document.dual.insert(a, b);
        self
    }

    pub fn dual_relation(mut self, dual: DualRelation) -> Self {
        self.document.dual = dual;
        self
    }

    /// The document without a pair table.
    pub fn build(self) -> Document {
        self.document
    }

    /// The document with its pair table built.
    pub fn built(self, config: &EngineConfig) -> (Document, RebuildStats) {
        let mut document = self.document;
        let stats = rebuild_pairs(&mut document, config);
        (document, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vartab_core::EventId;

    #[test]
    fn test_builder_assigns_sequential_ids() {
        let doc = DocumentBuilder::new()
            .modifiers(&["heavy", "quick"])
            .entities(2)
            .events(&["hit", "miss"])
            .build();

        assert_eq!(doc.catalog[1].id, ModifierId::new(2));
        assert_eq!(doc.entities[1].name, "e2");
        assert_eq!(doc.events[1].id, EventId::new(2));
    }

    #[test]
    fn test_all_entities_sets_states() {
        let doc = DocumentBuilder::new()
            .modifiers(&["a", "b"])
            .entities(2)
            .all_entities(&[1, 2], ModifierState::On)
            .build();

        for entity in &doc.entities {
            assert_eq!(entity.state(ModifierId::new(2)), ModifierState::On);
        }
    }
}
