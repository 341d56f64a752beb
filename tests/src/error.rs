//! Scenario error types.

use thiserror::Error;

/// Errors raised while running a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// A step name was used twice.
    #[error("duplicate step '{step}'")]
    DuplicateStep { step: String },

    /// A step's result or the document after it did not match.
    #[error("step '{step}' failed: {message}")]
    AssertionFailed { step: String, message: String },
}

impl ScenarioError {
    pub fn duplicate_step(step: impl Into<String>) -> Self {
        Self::DuplicateStep { step: step.into() }
    }

    pub fn assertion_failed(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            step: step.into(),
            message: message.into(),
        }
    }
}

/// Result type for scenario runs.
pub type ScenarioResult<T> = Result<T, ScenarioError>;
