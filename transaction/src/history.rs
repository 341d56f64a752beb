//! Bounded undo/redo history.

use std::fmt;

use crate::effects::StatusFormatter;

/// Which way an entry is being replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Undo,
    Redo,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Undo => write!(f, "Undo"),
            Direction::Redo => write!(f, "Redo"),
        }
    }
}

/// One committed outermost mutation.
pub struct HistoryEntry<I, A> {
    pub label: String,
    pub before: I,
    pub after: I,
    pub before_attachments: Option<A>,
    pub after_attachments: Option<A>,
    pub formatter: Option<StatusFormatter<A>>,
}

impl<I, A> HistoryEntry<I, A> {
    /// Attachments of the side restored when replaying in `direction`.
    pub fn attachments(&self, direction: Direction) -> Option<&A> {
        match direction {
            Direction::Undo => self.before_attachments.as_ref(),
            Direction::Redo => self.after_attachments.as_ref(),
        }
    }

    /// Snapshot restored when replaying in `direction`.
    pub fn image(&self, direction: Direction) -> &I {
        match direction {
            Direction::Undo => &self.before,
            Direction::Redo => &self.after,
        }
    }

    /// Status line after replaying in `direction`.
    pub fn status_message(&self, direction: Direction) -> String {
        match &self.formatter {
            Some(format) => format(&self.label, self.attachments(direction), direction),
            None => format!("{}: {}", direction, self.label),
        }
    }
}

impl<I, A> fmt::Debug for HistoryEntry<I, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryEntry")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Undo and redo stacks, each holding at most `limit` entries.
pub struct History<I, A> {
    undo: Vec<HistoryEntry<I, A>>,
    redo: Vec<HistoryEntry<I, A>>,
    limit: usize,
}

impl<I, A> History<I, A> {
    pub fn new(limit: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            limit,
        }
    }

    fn trim(stack: &mut Vec<HistoryEntry<I, A>>, limit: usize) {
        if stack.len() > limit {
            let excess = stack.len() - limit;
            stack.drain(0..excess);
        }
    }

    /// Record a fresh edit. Drops the oldest entries past the limit and
    /// clears the redo stack.
    pub fn push(&mut self, entry: HistoryEntry<I, A>) {
        self.undo.push(entry);
        Self::trim(&mut self.undo, self.limit);
        self.redo.clear();
    }

    pub fn pop_undo(&mut self) -> Option<HistoryEntry<I, A>> {
        self.undo.pop()
    }

    pub fn pop_redo(&mut self) -> Option<HistoryEntry<I, A>> {
        self.redo.pop()
    }

    /// Move an undone entry onto the redo stack.
    pub fn push_redo(&mut self, entry: HistoryEntry<I, A>) {
        self.redo.push(entry);
        Self::trim(&mut self.redo, self.limit);
    }

    /// Move a redone entry back onto the undo stack, keeping the redo stack.
    pub fn push_undone(&mut self, entry: HistoryEntry<I, A>) {
        self.undo.push(entry);
        Self::trim(&mut self.undo, self.limit);
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.undo.last().map(|e| e.label.as_str())
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.redo.last().map(|e| e.label.as_str())
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

impl<I, A> fmt::Debug for History<I, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("History")
            .field("undo", &self.undo.len())
            .field("redo", &self.redo.len())
            .field("limit", &self.limit)
            .finish()
    }
}
