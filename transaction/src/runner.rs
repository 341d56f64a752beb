//! Mutation runner: nestable transaction boundaries, effect flushing and
//! snapshot-based undo/redo.

use std::marker::PhantomData;

use tracing::{debug, info, warn};
use vartab_core::EngineConfig;

use crate::effects::{MutationOptions, PendingEffects};
use crate::history::{Direction, History, HistoryEntry};
use crate::snapshot::{CaptureScope, RestoreEffect, Snapshot};

/// Callbacks the runner drives when flushing effects or replaying history.
///
/// Every method defaults to a no-op.
pub trait RunnerHooks<D, A> {
    /// Regenerate derived state.
    fn rebuild(&mut self, _doc: &mut D) {}

    /// Drop cached views.
    fn invalidate(&mut self, _doc: &D) {}

    fn layout(&mut self, _doc: &D) {}

    /// Redraw; `epoch` increases on every render.
    fn render(&mut self, _doc: &D, _epoch: u64) {}

    fn status(&mut self, _message: &str) {}

    /// Reapply caller state captured with a snapshot.
    fn apply_attachments(&mut self, _doc: &mut D, _attachments: &A) {}
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl<D, A> RunnerHooks<D, A> for NoHooks {}

/// Undo/redo availability.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UndoState {
    pub can_undo: bool,
    pub can_redo: bool,
    pub undo_label: Option<String>,
    pub redo_label: Option<String>,
    pub undo_depth: usize,
    pub redo_depth: usize,
    pub render_epoch: u64,
}

fn capture_or_warn<D: Snapshot>(
    doc: &D,
    scope: CaptureScope,
    label: &str,
    purpose: &str,
) -> Option<D::Image> {
    match doc.capture(scope) {
        Ok(image) => Some(image),
        Err(err) => {
            warn!(label, purpose, error = %err, "snapshot capture failed; continuing without it");
            None
        }
    }
}

struct Checkpoint<I, A> {
    scope: CaptureScope,
    image: I,
    attachments: Option<A>,
}

/// Handle for an open transaction boundary.
///
/// Nested mutations and transactions run through this handle. Their effect
/// requests merge into the boundary and are flushed by the outermost one.
pub struct Transaction<'t, D, A = ()> {
    doc: &'t mut D,
    effects: PendingEffects,
    depth: usize,
    rollback_on_error: bool,
    _attachments: PhantomData<fn() -> A>,
}

impl<'t, D: Snapshot, A> Transaction<'t, D, A> {
    fn new(doc: &'t mut D, depth: usize, rollback_on_error: bool) -> Self {
        Self {
            doc,
            effects: PendingEffects::default(),
            depth,
            rollback_on_error,
            _attachments: PhantomData,
        }
    }

    pub fn doc(&self) -> &D {
        &*self.doc
    }

    pub fn doc_mut(&mut self) -> &mut D {
        &mut *self.doc
    }

    /// Nesting depth; the outermost boundary is 1.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Effects requested so far inside this boundary.
    pub fn pending(&self) -> &PendingEffects {
        &self.effects
    }

    /// Run a mutation inside this boundary. Its effects are merged, never
    /// flushed; undo options are ignored below the outermost boundary.
    pub fn run_mutation<T, E, F>(
        &mut self,
        label: &str,
        options: MutationOptions<T, D, A>,
        f: F,
    ) -> Result<T, E>
    where
        F: FnOnce(&mut D) -> Result<T, E>,
    {
        let value = f(&mut *self.doc)?;
        self.effects.merge(options.requested(&value));
        debug!(label, depth = self.depth, "nested mutation merged");
        Ok(value)
    }

    /// Open a nested boundary. On failure the document is restored to its
    /// state at entry and the nested effects are discarded.
    pub fn run_transaction<T, E, F>(
        &mut self,
        label: &str,
        options: MutationOptions<T, D, A>,
        f: F,
    ) -> Result<T, E>
    where
        F: FnOnce(&mut Transaction<'_, D, A>) -> Result<T, E>,
    {
        let rollback = if self.rollback_on_error {
            capture_or_warn(&*self.doc, CaptureScope::Full, label, "rollback")
        } else {
            None
        };

        let mut child = Transaction::new(&mut *self.doc, self.depth + 1, self.rollback_on_error);
        let result = f(&mut child);
        let nested = child.effects;

        match result {
            Ok(value) => {
                self.effects.merge(nested);
                self.effects.merge(options.requested(&value));
                Ok(value)
            }
            Err(err) => {
                if let Some(image) = rollback {
                    self.doc.restore(&image);
                }
                debug!(label, depth = self.depth + 1, "nested transaction cancelled");
                Err(err)
            }
        }
    }
}

/// Runs every edit to a document and owns its undo history.
pub struct MutationRunner<D: Snapshot, A = (), H = NoHooks> {
    history: History<D::Image, A>,
    hooks: H,
    default_scope: CaptureScope,
    rollback_on_error: bool,
    render_epoch: u64,
    last_status: Option<String>,
}

impl<D: Snapshot, A, H: RunnerHooks<D, A>> MutationRunner<D, A, H> {
    pub fn new(config: &EngineConfig, hooks: H) -> Self {
        let default_scope = if config.exclude_derived_from_snapshots {
            CaptureScope::ExcludeDerived
        } else {
            CaptureScope::Full
        };
        Self {
            history: History::new(config.history_limit),
            hooks,
            default_scope,
            rollback_on_error: config.rollback_on_error,
            render_epoch: 0,
            last_status: None,
        }
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    /// Counter bumped on every committed render and every undo/redo.
    pub fn render_epoch(&self) -> u64 {
        self.render_epoch
    }

    pub fn last_status(&self) -> Option<&str> {
        self.last_status.as_deref()
    }

    /// Run `f` once as its own outermost boundary.
    pub fn run_mutation<T, E, F>(
        &mut self,
        doc: &mut D,
        label: &str,
        options: MutationOptions<T, D, A>,
        f: F,
    ) -> Result<T, E>
    where
        F: FnOnce(&mut D) -> Result<T, E>,
    {
        self.run_transaction(doc, label, options, |tx| f(tx.doc_mut()))
    }

    /// Open an outermost boundary.
    ///
    /// On success, effects requested anywhere inside are flushed once and,
    /// when `options.undo` is set, one history entry is recorded. On failure
    /// nothing is flushed or recorded, the document is restored (when
    /// `rollback_on_error` is set) and the error is returned unchanged.
    pub fn run_transaction<T, E, F>(
        &mut self,
        doc: &mut D,
        label: &str,
        options: MutationOptions<T, D, A>,
        f: F,
    ) -> Result<T, E>
    where
        F: FnOnce(&mut Transaction<'_, D, A>) -> Result<T, E>,
    {
        let default_scope = self.default_scope;
        let before = options.undo.as_ref().and_then(|undo| {
            let scope = undo.scope.unwrap_or(default_scope);
            let image = capture_or_warn(&*doc, scope, label, "undo")?;
            Some(Checkpoint {
                scope,
                image,
                attachments: undo.attachments.as_ref().map(|capture| capture(&*doc)),
            })
        });

        let before_is_full = before
            .as_ref()
            .is_some_and(|checkpoint| checkpoint.scope == CaptureScope::Full);
        let rollback = if self.rollback_on_error && !before_is_full {
            capture_or_warn(&*doc, CaptureScope::Full, label, "rollback")
        } else {
            None
        };

        let mut tx = Transaction::new(&mut *doc, 1, self.rollback_on_error);
        let result = f(&mut tx);
        let mut pending = tx.effects;

        let value = match result {
            Ok(value) => value,
            Err(err) => {
                if self.rollback_on_error {
                    let image = rollback.as_ref().or_else(|| {
                        before
                            .as_ref()
                            .filter(|checkpoint| checkpoint.scope == CaptureScope::Full)
                            .map(|checkpoint| &checkpoint.image)
                    });
                    if let Some(image) = image {
                        doc.restore(image);
                    }
                }
                debug!(label, "transaction cancelled");
                return Err(err);
            }
        };

        pending.merge(options.requested(&value));
        self.flush(doc, pending);

        if let (Some(undo), Some(before)) = (options.undo, before) {
            let keep = undo.keep.as_ref().map_or(true, |keep| keep(&value, &*doc));
            if !keep {
                debug!(label, "undo entry discarded");
            } else if let Some(after) = capture_or_warn(&*doc, before.scope, label, "undo") {
                let after_attachments = undo.attachments.as_ref().map(|capture| capture(&*doc));
                self.history.push(HistoryEntry {
                    label: label.to_string(),
                    before: before.image,
                    after,
                    before_attachments: before.attachments,
                    after_attachments,
                    formatter: undo.status,
                });
                info!(label, depth = self.history.undo_len(), "undo entry recorded");
            }
        }

        Ok(value)
    }

    fn flush(&mut self, doc: &mut D, pending: PendingEffects) {
        if pending.rebuild {
            self.hooks.rebuild(doc);
        }
        if pending.invalidate {
            self.hooks.invalidate(doc);
        }
        if pending.layout {
            self.hooks.layout(doc);
        }
        if pending.render {
            self.render_epoch += 1;
            self.hooks.render(doc, self.render_epoch);
        }
        if let Some(message) = pending.status {
            self.hooks.status(&message);
            self.last_status = Some(message);
        }
    }

    fn replay(&mut self, doc: &mut D, direction: Direction) -> bool {
        let entry = match direction {
            Direction::Undo => self.history.pop_undo(),
            Direction::Redo => self.history.pop_redo(),
        };
        let Some(entry) = entry else {
            return false;
        };

        if doc.restore(entry.image(direction)) == RestoreEffect::DerivedStale {
            self.hooks.rebuild(doc);
        }
        if let Some(attachments) = entry.attachments(direction) {
            self.hooks.apply_attachments(doc, attachments);
        }
        self.hooks.invalidate(doc);
        self.hooks.layout(doc);
        self.render_epoch += 1;
        self.hooks.render(doc, self.render_epoch);

        let message = entry.status_message(direction);
        info!(label = %entry.label, %direction, epoch = self.render_epoch, "history replayed");
        self.hooks.status(&message);
        self.last_status = Some(message);

        match direction {
            Direction::Undo => self.history.push_redo(entry),
            Direction::Redo => self.history.push_undone(entry),
        }
        true
    }

    /// Restore the state before the latest entry. Returns false when there
    /// is nothing to undo.
    pub fn undo(&mut self, doc: &mut D) -> bool {
        self.replay(doc, Direction::Undo)
    }

    /// Reapply the latest undone entry. Returns false when there is nothing
    /// to redo.
    pub fn redo(&mut self, doc: &mut D) -> bool {
        self.replay(doc, Direction::Redo)
    }

    pub fn undo_state(&self) -> UndoState {
        UndoState {
            can_undo: self.history.undo_len() > 0,
            can_redo: self.history.redo_len() > 0,
            undo_label: self.history.undo_label().map(str::to_string),
            redo_label: self.history.redo_label().map(str::to_string),
            undo_depth: self.history.undo_len(),
            redo_depth: self.history.redo_len(),
            render_epoch: self.render_epoch,
        }
    }

    /// Drop both stacks. The document is not touched.
    pub fn clear_history(&mut self) {
        self.history.clear();
        info!("history cleared");
    }
}
