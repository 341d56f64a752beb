//! Note store addressed by canonical pair identity.

use tracing::debug;
use vartab_core::{Document, Note, NoteKey};

use crate::error::{PairError, PairResult};

/// Note stored under `key`, if any.
pub fn note<'d>(document: &'d Document, key: &NoteKey) -> Option<&'d Note> {
    document.notes.get(key)
}

fn ensure_live(document: &Document, key: &NoteKey) -> PairResult<()> {
    if document.pair_index.contains_key(&key.base()) {
        Ok(())
    } else {
        Err(PairError::UnknownPair(key.clone()))
    }
}

/// Mirror target of a dual-phase write on a self-mode row, if any.
fn dual_mirror(
    document: &Document,
    key: &NoteKey,
    dual_phase: &str,
) -> PairResult<Option<NoteKey>> {
    if key.phase() != Some(dual_phase) {
        return Ok(None);
    }
    let Some(mirror) = key.mirrored() else {
        return Ok(None);
    };
    if !document.pair_index.contains_key(&mirror.base()) {
        return Err(PairError::MirrorMissing(key.clone()));
    }
    Ok(Some(mirror))
}

/// Store `note` under `key`. Returns every key written.
///
/// At the dual phase on a self-mode row, the dual of the outcome is written
/// onto the swapped row at the same phase; the mirror's text is kept. An
/// empty note behaves like [`clear_note`].
pub fn set_note(
    document: &mut Document,
    key: &NoteKey,
    note: Note,
    dual_phase: &str,
) -> PairResult<Vec<NoteKey>> {
    if note.is_empty() {
        return clear_note(document, key, dual_phase);
    }

    ensure_live(document, key)?;
    let mirror = dual_mirror(document, key, dual_phase)?;

    let mut written = vec![key.clone()];
    if let Some(mirror) = mirror {
        let dual = note.outcome.as_deref().map(|o| document.dual.dual_of(o));
        let entry = document.notes.entry(mirror.clone()).or_default();
        entry.outcome = dual;
        if entry.is_empty() {
            document.notes.remove(&mirror);
        }
        written.push(mirror);
    }
    document.notes.insert(key.clone(), note);

    debug!(key = %key, written = written.len(), "note set");
    Ok(written)
}

/// Remove the note under `key`. Returns every key changed.
///
/// At the dual phase on a self-mode row, the swapped row's outcome is
/// cleared too.
pub fn clear_note(
    document: &mut Document,
    key: &NoteKey,
    dual_phase: &str,
) -> PairResult<Vec<NoteKey>> {
    let mut changed = Vec::new();
    if document.notes.remove(key).is_some() {
        changed.push(key.clone());
    }

    if let Some(mirror) = dual_mirror(document, key, dual_phase)? {
        if let Some(entry) = document.notes.get_mut(&mirror) {
            entry.outcome = None;
            if entry.is_empty() {
                document.notes.remove(&mirror);
            }
            changed.push(mirror);
        }
    }

    Ok(changed)
}

/// Drop every note whose pair is no longer in the table. Returns the count.
///
/// Run after a rebuild; an unbuilt table would prune everything.
pub fn prune_notes(document: &mut Document) -> usize {
    let before = document.notes.len();
    let index = &document.pair_index;
    document.notes.retain(|key, _| index.contains_key(&key.base()));
    let removed = before - document.notes.len();
    if removed > 0 {
        debug!(removed, "pruned notes");
    }
    removed
}
