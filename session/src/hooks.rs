//! Presentation callbacks and the runner hooks that drive them.

use tracing::debug;
use vartab_core::{Document, EngineConfig, NoteKey};
use vartab_pairs::{prune_notes, rebuild_pairs, RebuildStats};
use vartab_transaction::RunnerHooks;

/// Presentation collaborator notified by the workbench.
///
/// Every method defaults to a no-op, so a presenter only implements the
/// callbacks it cares about.
pub trait Presenter {
    /// Drop any cached view of the table.
    fn invalidate(&mut self) {}

    fn layout(&mut self) {}

    /// Redraw. `epoch` grows on every render; equal epochs mean nothing
    /// changed.
    fn render(&mut self, _document: &Document, _epoch: u64) {}

    fn status(&mut self, _message: &str) {}

    /// Move the caret back to a note restored by undo or redo.
    fn focus(&mut self, _key: &NoteKey) {}
}

/// Presenter that ignores every callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {}

/// One callback seen by a [`RecordingPresenter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterEvent {
    Invalidate,
    Layout,
    Render(u64),
    Status(String),
    Focus(NoteKey),
}

/// Presenter that records every callback, in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    pub events: Vec<PresenterEvent>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status messages received so far.
    pub fn statuses(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                PresenterEvent::Status(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of render callbacks received.
    pub fn render_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, PresenterEvent::Render(_)))
            .count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Presenter for RecordingPresenter {
    fn invalidate(&mut self) {
        self.events.push(PresenterEvent::Invalidate);
    }

    fn layout(&mut self) {
        self.events.push(PresenterEvent::Layout);
    }

    fn render(&mut self, _document: &Document, epoch: u64) {
        self.events.push(PresenterEvent::Render(epoch));
    }

    fn status(&mut self, message: &str) {
        self.events.push(PresenterEvent::Status(message.to_string()));
    }

    fn focus(&mut self, key: &NoteKey) {
        self.events.push(PresenterEvent::Focus(key.clone()));
    }
}

/// Runner hooks for a [`Document`]: rebuild regenerates the pair table and
/// prunes orphaned notes; everything else is forwarded to the presenter.
pub struct WorkbenchHooks<P> {
    config: EngineConfig,
    presenter: P,
    last_rebuild: RebuildStats,
    last_pruned: usize,
    restored_focus: Option<NoteKey>,
}

impl<P: Presenter> WorkbenchHooks<P> {
    pub fn new(config: EngineConfig, presenter: P) -> Self {
        Self {
            config,
            presenter,
            last_rebuild: RebuildStats::default(),
            last_pruned: 0,
            restored_focus: None,
        }
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Summary of the latest rebuild.
    pub fn last_rebuild(&self) -> &RebuildStats {
        &self.last_rebuild
    }

    /// Notes dropped by the latest rebuild.
    pub fn last_pruned(&self) -> usize {
        self.last_pruned
    }

    /// Focus reapplied by the latest undo or redo, consumed on read.
    pub fn take_restored_focus(&mut self) -> Option<NoteKey> {
        self.restored_focus.take()
    }
}

impl<P: Presenter> RunnerHooks<Document, Option<NoteKey>> for WorkbenchHooks<P> {
    fn rebuild(&mut self, doc: &mut Document) {
        self.last_rebuild = rebuild_pairs(doc, &self.config);
        self.last_pruned = prune_notes(doc);
        debug!(
            pairs = self.last_rebuild.pair_count,
            pruned = self.last_pruned,
            "derived state regenerated"
        );
    }

    fn invalidate(&mut self, _doc: &Document) {
        self.presenter.invalidate();
    }

    fn layout(&mut self, _doc: &Document) {
        self.presenter.layout();
    }

    fn render(&mut self, doc: &Document, epoch: u64) {
        self.presenter.render(doc, epoch);
    }

    fn status(&mut self, message: &str) {
        self.presenter.status(message);
    }

    fn apply_attachments(&mut self, _doc: &mut Document, focus: &Option<NoteKey>) {
        if let Some(key) = focus {
            self.presenter.focus(key);
        }
        self.restored_focus.clone_from(focus);
    }
}
