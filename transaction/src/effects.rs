//! Side-effect requests and undo options for a mutation.

use std::fmt;

use crate::history::Direction;
use crate::snapshot::CaptureScope;

/// Whether a side effect runs, decided up front or from the mutation's result.
pub enum Effect<T> {
    Skip,
    Always,
    When(Box<dyn Fn(&T) -> bool>),
}

impl<T> Effect<T> {
    pub fn when(predicate: impl Fn(&T) -> bool + 'static) -> Self {
        Self::When(Box::new(predicate))
    }

    /// Decide against the mutation's result.
    pub fn resolve(&self, value: &T) -> bool {
        match self {
            Effect::Skip => false,
            Effect::Always => true,
            Effect::When(predicate) => predicate(value),
        }
    }
}

impl<T> Default for Effect<T> {
    fn default() -> Self {
        Self::Skip
    }
}

impl<T> From<bool> for Effect<T> {
    fn from(enabled: bool) -> Self {
        if enabled {
            Self::Always
        } else {
            Self::Skip
        }
    }
}

impl<T> fmt::Debug for Effect<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Skip => f.write_str("Skip"),
            Effect::Always => f.write_str("Always"),
            Effect::When(_) => f.write_str("When(..)"),
        }
    }
}

/// Builds the status line shown after undo or redo.
///
/// Receives the entry label and the attachments of the restored side.
pub type StatusFormatter<A> = Box<dyn Fn(&str, Option<&A>, Direction) -> String>;

/// Undo capture settings for an outermost boundary.
pub struct UndoOptions<T, D, A> {
    /// Override the runner's default capture scope.
    pub scope: Option<CaptureScope>,
    /// Caller state captured alongside each snapshot.
    pub attachments: Option<Box<dyn Fn(&D) -> A>>,
    /// Keep the entry only if this returns true after the mutation.
    pub keep: Option<Box<dyn Fn(&T, &D) -> bool>>,
    pub status: Option<StatusFormatter<A>>,
}

impl<T, D, A> UndoOptions<T, D, A> {
    pub fn new() -> Self {
        Self {
            scope: None,
            attachments: None,
            keep: None,
            status: None,
        }
    }

    pub fn scope(mut self, scope: CaptureScope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn attachments(mut self, capture: impl Fn(&D) -> A + 'static) -> Self {
        self.attachments = Some(Box::new(capture));
        self
    }

    pub fn keep_if(mut self, predicate: impl Fn(&T, &D) -> bool + 'static) -> Self {
        self.keep = Some(Box::new(predicate));
        self
    }

    pub fn status(
        mut self,
        formatter: impl Fn(&str, Option<&A>, Direction) -> String + 'static,
    ) -> Self {
        self.status = Some(Box::new(formatter));
        self
    }
}

impl<T, D, A> Default for UndoOptions<T, D, A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Side effects and undo settings declared by one mutation.
pub struct MutationOptions<T, D, A = ()> {
    pub rebuild: Effect<T>,
    pub invalidate: Effect<T>,
    pub layout: Effect<T>,
    pub render: Effect<T>,
    pub status: Option<Box<dyn Fn(&T) -> Option<String>>>,
    pub undo: Option<UndoOptions<T, D, A>>,
}

impl<T, D, A> MutationOptions<T, D, A> {
    /// No effects, no undo.
    pub fn new() -> Self {
        Self {
            rebuild: Effect::Skip,
            invalidate: Effect::Skip,
            layout: Effect::Skip,
            render: Effect::Skip,
            status: None,
            undo: None,
        }
    }

    /// Structural edit: rebuild derived state and refresh every view.
    pub fn structural() -> Self {
        Self::new()
            .rebuild(true)
            .invalidate(true)
            .layout(true)
            .render(true)
    }

    pub fn rebuild(mut self, effect: impl Into<Effect<T>>) -> Self {
        self.rebuild = effect.into();
        self
    }

    pub fn invalidate(mut self, effect: impl Into<Effect<T>>) -> Self {
        self.invalidate = effect.into();
        self
    }

    pub fn layout(mut self, effect: impl Into<Effect<T>>) -> Self {
        self.layout = effect.into();
        self
    }

    pub fn render(mut self, effect: impl Into<Effect<T>>) -> Self {
        self.render = effect.into();
        self
    }

    /// Fixed status line.
    pub fn status(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.status = Some(Box::new(move |_| Some(message.clone())));
        self
    }

    /// Status line computed from the result.
    pub fn status_with(mut self, message: impl Fn(&T) -> Option<String> + 'static) -> Self {
        self.status = Some(Box::new(message));
        self
    }

    pub fn undo(mut self, undo: UndoOptions<T, D, A>) -> Self {
        self.undo = Some(undo);
        self
    }

    /// Resolve every request against the result.
    pub fn requested(&self, value: &T) -> PendingEffects {
        PendingEffects {
            rebuild: self.rebuild.resolve(value),
            invalidate: self.invalidate.resolve(value),
            layout: self.layout.resolve(value),
            render: self.render.resolve(value),
            status: self.status.as_ref().and_then(|status| status(value)),
        }
    }
}

impl<T, D, A> Default for MutationOptions<T, D, A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Effects accumulated inside a boundary, flushed once by the outermost.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingEffects {
    pub rebuild: bool,
    pub invalidate: bool,
    pub layout: bool,
    pub render: bool,
    pub status: Option<String>,
}

impl PendingEffects {
    /// Union of requests; a later status line replaces an earlier one.
    pub fn merge(&mut self, other: PendingEffects) {
        self.rebuild |= other.rebuild;
        self.invalidate |= other.invalidate;
        self.layout |= other.layout;
        self.render |= other.render;
        if other.status.is_some() {
            self.status = other.status;
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
