//! Assertion types and builders for verifying step results.

use vartab_core::NoteKey;

use crate::error::{ScenarioError, ScenarioResult};
use crate::scenario::Bench;

/// Expectations checked after one step.
#[derive(Default)]
pub struct Assertion {
    // Table assertions
    pub pairs: Option<usize>,
    pub entities: Option<usize>,
    pub capped: Option<bool>,

    // Note assertions
    pub notes: Option<usize>,
    pub note_texts: Vec<(NoteKey, Option<String>)>,
    pub note_outcomes: Vec<(NoteKey, Option<String>)>,

    // History assertions
    pub undo_depth: Option<usize>,
    pub redo_depth: Option<usize>,
    pub render_epoch: Option<u64>,
    pub status: Option<String>,

    // Error assertions
    pub error: Option<String>,

    // Custom assertion function
    #[allow(clippy::type_complexity)]
    pub custom: Option<Box<dyn Fn(&Bench) -> bool>>,
}

impl std::fmt::Debug for Assertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assertion")
            .field("pairs", &self.pairs)
            .field("entities", &self.entities)
            .field("notes", &self.notes)
            .field("undo_depth", &self.undo_depth)
            .field("redo_depth", &self.redo_depth)
            .field("error", &self.error)
            .field("custom", &self.custom.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

fn check<T: PartialEq + std::fmt::Debug>(
    step: &str,
    what: &str,
    expected: Option<T>,
    actual: T,
) -> ScenarioResult<()> {
    match expected {
        Some(expected) if expected != actual => Err(ScenarioError::assertion_failed(
            step,
            format!("expected {} {:?}, got {:?}", what, expected, actual),
        )),
        _ => Ok(()),
    }
}

impl Assertion {
    /// Create a new empty assertion.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pairs(mut self, count: usize) -> Self {
        self.pairs = Some(count);
        self
    }

    pub fn entities(mut self, count: usize) -> Self {
        self.entities = Some(count);
        self
    }

    /// Whether the latest rebuild hit the variant cap.
    pub fn capped(mut self, capped: bool) -> Self {
        self.capped = Some(capped);
        self
    }

    pub fn notes(mut self, count: usize) -> Self {
        self.notes = Some(count);
        self
    }

    /// Note under `key` has this text.
    pub fn note_text(mut self, key: &NoteKey, text: &str) -> Self {
        self.note_texts.push((key.clone(), Some(text.to_string())));
        self
    }

    /// Note under `key` has this outcome.
    pub fn note_outcome(mut self, key: &NoteKey, outcome: &str) -> Self {
        self.note_outcomes
            .push((key.clone(), Some(outcome.to_string())));
        self
    }

    /// Nothing stored under `key`.
    pub fn no_note(mut self, key: &NoteKey) -> Self {
        self.note_texts.push((key.clone(), None));
        self
    }

    pub fn undo_depth(mut self, depth: usize) -> Self {
        self.undo_depth = Some(depth);
        self
    }

    pub fn redo_depth(mut self, depth: usize) -> Self {
        self.redo_depth = Some(depth);
        self
    }

    pub fn render_epoch(mut self, epoch: u64) -> Self {
        self.render_epoch = Some(epoch);
        self
    }

    pub fn status(mut self, message: &str) -> Self {
        self.status = Some(message.to_string());
        self
    }

    /// The step fails with an error containing `message`.
    pub fn error(mut self, message: &str) -> Self {
        self.error = Some(message.to_string());
        self
    }

    pub fn custom(mut self, check: impl Fn(&Bench) -> bool + 'static) -> Self {
        self.custom = Some(Box::new(check));
        self
    }

    /// Verify the assertion against a step result and the bench after it.
    pub fn verify(&self, step: &str, result: &Result<(), String>, bench: &Bench) -> ScenarioResult<()> {
        // Check error expectations first
        match (&self.error, result) {
            (Some(expected), Err(msg)) if !msg.contains(expected.as_str()) => {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!("expected error containing '{}', got: {}", expected, msg),
                ))
            }
            (Some(expected), Ok(())) => {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!("expected error containing '{}', but step succeeded", expected),
                ))
            }
            (None, Err(msg)) => {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!("step failed: {}", msg),
                ))
            }
            _ => {}
        }

        let document = bench.document();
        check(step, "pairs", self.pairs, document.pairs.len())?;
        check(step, "entities", self.entities, document.entities.len())?;
        check(step, "capped", self.capped, bench.last_rebuild().capped)?;
        check(step, "notes", self.notes, document.notes.len())?;

        for (key, expected) in &self.note_texts {
            let actual = bench.note(key).map(|n| n.text.clone());
            check(step, &format!("text of {}", key), Some(expected.clone()), actual)?;
        }
        for (key, expected) in &self.note_outcomes {
            let actual = bench.note(key).and_then(|n| n.outcome.clone());
            check(step, &format!("outcome of {}", key), Some(expected.clone()), actual)?;
        }

        let state = bench.undo_state();
        check(step, "undo depth", self.undo_depth, state.undo_depth)?;
        check(step, "redo depth", self.redo_depth, state.redo_depth)?;
        check(step, "render epoch", self.render_epoch, state.render_epoch)?;
        check(
            step,
            "status",
            self.status.as_deref().map(Some),
            bench.last_status(),
        )?;

        if let Some(ref custom) = self.custom {
            if !custom(bench) {
                return Err(ScenarioError::assertion_failed(
                    step,
                    "custom assertion failed",
                ));
            }
        }

        Ok(())
    }
}
