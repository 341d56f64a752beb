//! Snapshot capture and in-place restore.

use vartab_core::Document;

use crate::error::SnapshotResult;

/// How much of a document a snapshot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureScope {
    /// Everything, including derived state.
    Full,
    /// Authoritative state only; derived state is regenerated after restore.
    ExcludeDerived,
}

/// What a restore left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreEffect {
    /// The document is exactly the captured state.
    Complete,
    /// Authoritative state restored; derived state must be rebuilt.
    DerivedStale,
}

/// A document the runner can snapshot.
///
/// Images are deep copies: nothing in an image aliases the live document.
pub trait Snapshot {
    type Image;

    /// Deep-copy the document.
    fn capture(&self, scope: CaptureScope) -> SnapshotResult<Self::Image>;

    /// Overwrite this document's contents with `image`, keeping `self` in place.
    fn restore(&mut self, image: &Self::Image) -> RestoreEffect;
}

/// Snapshot of a [`Document`].
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentImage {
    document: Document,
    derived: bool,
}

impl DocumentImage {
    /// Whether the pair table and index were captured.
    pub fn has_derived(&self) -> bool {
        self.derived
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl Snapshot for Document {
    type Image = DocumentImage;

    fn capture(&self, scope: CaptureScope) -> SnapshotResult<DocumentImage> {
        let derived = scope == CaptureScope::Full;
        let document = Document {
            catalog: self.catalog.clone(),
            entities: self.entities.clone(),
            events: self.events.clone(),
            groups: self.groups.clone(),
            constraints: self.constraints.clone(),
            mode: self.mode,
            dual: self.dual.clone(),
            notes: self.notes.clone(),
            pairs: if derived { self.pairs.clone() } else { Vec::new() },
            pair_index: if derived {
                self.pair_index.clone()
            } else {
                Default::default()
            },
        };
        Ok(DocumentImage { document, derived })
    }

    fn restore(&mut self, image: &DocumentImage) -> RestoreEffect {
        let source = &image.document;
        self.catalog.clone_from(&source.catalog);
        self.entities.clone_from(&source.entities);
        self.events.clone_from(&source.events);
        self.groups.clone_from(&source.groups);
        self.constraints.clone_from(&source.constraints);
        self.mode = source.mode;
        self.dual.clone_from(&source.dual);
        self.notes.clone_from(&source.notes);

        if image.derived {
            self.pairs.clone_from(&source.pairs);
            self.pair_index.clone_from(&source.pair_index);
            RestoreEffect::Complete
        } else {
            self.clear_derived();
            RestoreEffect::DerivedStale
        }
    }
}
