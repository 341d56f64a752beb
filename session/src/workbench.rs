//! The workbench: one document, one runner, every sanctioned edit.

use std::convert::Infallible;

use tracing::info;
use vartab_constraint::{build_constraint_maps, explain_violations, Violation};
use vartab_core::{
    CleanupReport, Document, DualRelation, EngineConfig, Entity, EntityId, Event, EventId,
    GroupId, GroupMode, Modifier, ModifierConstraint, ModifierGroup, ModifierId, ModifierState,
    Note, NoteKey, TableMode,
};
use vartab_pairs::RebuildStats;
use vartab_transaction::{
    MutationOptions, MutationRunner, RunnerHooks, Transaction, UndoOptions, UndoState,
};
use vartab_variant::{VariantCollector, VariantSet};

use crate::error::{SessionError, SessionResult};
use crate::hooks::{NullPresenter, Presenter, WorkbenchHooks};
use crate::persist;

/// Caller state captured with each undo entry: the note the user was on.
pub type Focus = Option<NoteKey>;

/// Transaction handle passed to [`Workbench::transaction`].
pub type WorkbenchTransaction<'t> = Transaction<'t, Document, Focus>;

type Runner<P> = MutationRunner<Document, Focus, WorkbenchHooks<P>>;

/// Root editing context.
///
/// Owns the document and routes every edit through the mutation runner, so
/// each operation is atomic, flushes its effects once and can be undone.
pub struct Workbench<P: Presenter = NullPresenter> {
    /// The document being edited.
    document: Document,
    /// Engine configuration.
    config: EngineConfig,
    /// Write path and history.
    runner: Runner<P>,
    /// Note the user is on; captured with undo entries.
    focus: Focus,
}

impl Workbench<NullPresenter> {
    /// Create an empty workbench without a presenter.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_presenter(config, NullPresenter)
    }
}

impl<P: Presenter> Workbench<P> {
    /// Create an empty workbench.
    pub fn with_presenter(config: EngineConfig, presenter: P) -> Self {
        Self::from_document(Document::new(), config, presenter)
    }

    /// Create a workbench over an existing document. The pair table is
    /// rebuilt and orphaned notes are pruned.
    pub fn from_document(mut document: Document, config: EngineConfig, presenter: P) -> Self {
        let mut hooks = WorkbenchHooks::new(config.clone(), presenter);
        hooks.rebuild(&mut document);
        Self {
            document,
            runner: MutationRunner::new(&config, hooks),
            config,
            focus: None,
        }
    }

    // ========== Accessors ==========

    /// Get a reference to the document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Get the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn presenter(&self) -> &P {
        self.runner.hooks().presenter()
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        self.runner.hooks_mut().presenter_mut()
    }

    /// Summary of the latest pair table rebuild.
    pub fn last_rebuild(&self) -> &RebuildStats {
        self.runner.hooks().last_rebuild()
    }

    pub fn render_epoch(&self) -> u64 {
        self.runner.render_epoch()
    }

    pub fn last_status(&self) -> Option<&str> {
        self.runner.last_status()
    }

    pub fn focus(&self) -> Option<&NoteKey> {
        self.focus.as_ref()
    }

    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
    }

    /// Note stored under `key`, if any.
    pub fn note(&self, key: &NoteKey) -> Option<&Note> {
        vartab_pairs::note(&self.document, key)
    }

    /// Enumerate the variants of one entity against the current rules.
    pub fn variants(&self, entity: EntityId) -> SessionResult<VariantSet> {
        let entity = self
            .document
            .entity(entity)
            .ok_or(vartab_core::CoreError::EntityNotFound(entity))?;
        Ok(VariantCollector::new(&self.document, &self.config).collect(entity))
    }

    /// Every rule a candidate modifier set breaks.
    pub fn explain(&self, candidate: &[ModifierId]) -> Vec<Violation> {
        let maps = build_constraint_maps(&self.document.constraints);
        explain_violations(candidate, &maps)
    }

    // ========== Edit plumbing ==========

    fn undo_options<T>(&self) -> UndoOptions<T, Document, Focus> {
        let focus = self.focus.clone();
        UndoOptions::new().attachments(move |_| focus.clone())
    }

    /// Edit that changes what pairs exist: rebuild, prune, full refresh.
    fn structural<T, F>(&mut self, label: &str, f: F) -> SessionResult<T>
    where
        F: FnOnce(&mut Document) -> SessionResult<T>,
    {
        let options = MutationOptions::structural()
            .status(label)
            .undo(self.undo_options());
        self.runner.run_mutation(&mut self.document, label, options, f)
    }

    /// Edit that leaves the pair table alone.
    fn annotation<T, F>(&mut self, label: &str, f: F) -> SessionResult<T>
    where
        F: FnOnce(&mut Document) -> SessionResult<T>,
    {
        let options = MutationOptions::new()
            .invalidate(true)
            .render(true)
            .status(label)
            .undo(self.undo_options());
        self.runner.run_mutation(&mut self.document, label, options, f)
    }

    // ========== Catalog ==========

    /// Append a modifier to the catalog.
    pub fn add_modifier(&mut self, name: &str) -> SessionResult<ModifierId> {
        self.structural("Add modifier", |doc| {
            let id = doc.next_modifier_id();
            doc.add_modifier(Modifier::new(id, name))?;
            Ok(id)
        })
    }

    /// Remove a modifier and every reference to it.
    pub fn delete_modifier(&mut self, id: ModifierId) -> SessionResult<CleanupReport> {
        self.structural("Delete modifier", |doc| {
            doc.remove_modifier(id)?;
            Ok(doc.cleanup_dangling_ids())
        })
    }

    pub fn reorder_catalog(&mut self, order: &[ModifierId]) -> SessionResult<()> {
        self.structural("Reorder modifiers", |doc| Ok(doc.reorder_catalog(order)?))
    }

    /// Drop references to modifiers no longer in the catalog.
    pub fn cleanup_dangling_ids(&mut self) -> SessionResult<CleanupReport> {
        self.structural("Clean up modifiers", |doc| Ok(doc.cleanup_dangling_ids()))
    }

    // ========== Entities and events ==========

    pub fn add_entity(&mut self, name: &str) -> SessionResult<EntityId> {
        self.structural("Add entity", |doc| {
            let id = doc.next_entity_id();
            doc.add_entity(Entity::new(id, name))?;
            Ok(id)
        })
    }

    pub fn remove_entity(&mut self, id: EntityId) -> SessionResult<Entity> {
        self.structural("Remove entity", |doc| Ok(doc.remove_entity(id)?))
    }

    pub fn add_event(&mut self, name: &str) -> SessionResult<EventId> {
        self.structural("Add event", |doc| {
            let id = doc.next_event_id();
            doc.add_event(Event::new(id, name))?;
            Ok(id)
        })
    }

    pub fn remove_event(&mut self, id: EventId) -> SessionResult<Event> {
        self.structural("Remove event", |doc| Ok(doc.remove_event(id)?))
    }

    pub fn set_modifier_state(
        &mut self,
        entity: EntityId,
        modifier: ModifierId,
        state: ModifierState,
    ) -> SessionResult<()> {
        self.structural("Set modifier state", |doc| {
            Ok(doc.set_modifier_state(entity, modifier, state)?)
        })
    }

    // ========== Rules ==========

    pub fn add_group(
        &mut self,
        name: &str,
        mode: GroupMode,
        required: bool,
        members: &[ModifierId],
    ) -> SessionResult<GroupId> {
        self.structural("Add group", |doc| {
            let id = doc.next_group_id();
            let group = ModifierGroup::new(id, name, mode)
                .required(required)
                .with_members(members.iter().copied());
            doc.add_group(group)?;
            Ok(id)
        })
    }

    pub fn remove_group(&mut self, id: GroupId) -> SessionResult<ModifierGroup> {
        self.structural("Remove group", |doc| Ok(doc.remove_group(id)?))
    }

    /// Append a constraint. Returns its position.
    pub fn add_constraint(&mut self, constraint: ModifierConstraint) -> SessionResult<usize> {
        self.structural("Add constraint", |doc| {
            doc.add_constraint(constraint);
            Ok(doc.constraints.len() - 1)
        })
    }

    pub fn remove_constraint(&mut self, index: usize) -> SessionResult<ModifierConstraint> {
        self.structural("Remove constraint", |doc| {
            doc.remove_constraint(index)
                .ok_or_else(|| SessionError::constraint_not_found(index))
        })
    }

    /// Switch between entity x event and entity x entity tables.
    pub fn set_mode(&mut self, mode: TableMode) -> SessionResult<()> {
        self.structural("Change table mode", |doc| {
            doc.mode = mode;
            Ok(())
        })
    }

    pub fn set_dual(&mut self, dual: DualRelation) -> SessionResult<()> {
        self.annotation("Set dual outcomes", |doc| {
            doc.dual = dual;
            Ok(())
        })
    }

    // ========== Notes ==========

    /// Store a note. Returns every key written, including a dual mirror.
    pub fn set_note(&mut self, key: &NoteKey, note: Note) -> SessionResult<Vec<NoteKey>> {
        let phase = self.config.dual_phase.clone();
        self.focused_annotation(key, "Set note", |doc| {
            Ok(vartab_pairs::set_note(doc, key, note, &phase)?)
        })
    }

    /// Remove a note. Returns every key changed, including a dual mirror.
    pub fn clear_note(&mut self, key: &NoteKey) -> SessionResult<Vec<NoteKey>> {
        let phase = self.config.dual_phase.clone();
        self.focused_annotation(key, "Clear note", |doc| {
            Ok(vartab_pairs::clear_note(doc, key, &phase)?)
        })
    }

    /// Annotation recorded with focus on `key`; a failed edit keeps the old focus.
    fn focused_annotation<T, F>(&mut self, key: &NoteKey, label: &str, f: F) -> SessionResult<T>
    where
        F: FnOnce(&mut Document) -> SessionResult<T>,
    {
        let previous = self.focus.replace(key.clone());
        let result = self.annotation(label, f);
        if result.is_err() {
            self.focus = previous;
        }
        result
    }

    /// Drop notes whose pair no longer exists. Returns the count.
    pub fn prune_notes(&mut self) -> SessionResult<usize> {
        self.annotation("Prune notes", |doc| Ok(vartab_pairs::prune_notes(doc)))
    }

    // ========== Transactions and history ==========

    /// Compose several edits into one atomic, undoable step.
    ///
    /// The pair table is rebuilt once at the end. If `f` fails the document
    /// is left as it was.
    pub fn transaction<T, F>(&mut self, label: &str, f: F) -> SessionResult<T>
    where
        F: FnOnce(&mut WorkbenchTransaction<'_>) -> SessionResult<T>,
    {
        let options = MutationOptions::structural()
            .status(label)
            .undo(self.undo_options());
        self.runner
            .run_transaction(&mut self.document, label, options, f)
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.runner.undo(&mut self.document);
        self.sync_focus();
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.runner.redo(&mut self.document);
        self.sync_focus();
        redone
    }

    fn sync_focus(&mut self) {
        if let Some(key) = self.runner.hooks_mut().take_restored_focus() {
            self.focus = Some(key);
        }
    }

    pub fn undo_state(&self) -> UndoState {
        self.runner.undo_state()
    }

    pub fn clear_history(&mut self) {
        self.runner.clear_history();
    }

    /// Regenerate the pair table and refresh views. Not recorded in history.
    pub fn rebuild(&mut self) -> RebuildStats {
        let options = MutationOptions::structural();
        let _: Result<(), Infallible> =
            self.runner
                .run_mutation(&mut self.document, "Rebuild", options, |_| Ok(()));
        self.last_rebuild().clone()
    }

    // ========== Persistence ==========

    /// Serialize the document.
    pub fn save_json(&self) -> SessionResult<String> {
        persist::to_json(&self.document)
    }

    /// Replace the document with a persisted one. History is cleared.
    pub fn load_json(&mut self, source: &str) -> SessionResult<RebuildStats> {
        let loaded = persist::parse_json(source)?;
        let options = MutationOptions::structural().status("Open document");
        self.runner
            .run_mutation(&mut self.document, "Open document", options, |doc| {
                *doc = loaded;
                Ok::<_, SessionError>(())
            })?;
        self.runner.clear_history();
        self.focus = None;
        info!(
            pairs = self.last_rebuild().pair_count,
            notes = self.document.notes.len(),
            "document opened"
        );
        Ok(self.last_rebuild().clone())
    }
}
