//! Common error types for vartab.

use crate::{EntityId, EventId, GroupId, ModifierId};
use thiserror::Error;

/// Errors raised by document lookups and record validation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Modifier not in the catalog.
    #[error("Modifier not found: {0}")]
    ModifierNotFound(ModifierId),

    /// Entity not found.
    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    /// Event not found.
    #[error("Event not found: {0}")]
    EventNotFound(EventId),

    /// Group not found.
    #[error("Group not found: {0}")]
    GroupNotFound(GroupId),

    /// A record with this id already exists.
    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    /// Group record is structurally invalid.
    #[error("Invalid group {group}: {message}")]
    InvalidGroup { group: GroupId, message: String },

    /// Catalog reorder did not name every modifier exactly once.
    #[error("Invalid catalog order: {0}")]
    InvalidOrder(String),

    /// Configuration could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl CoreError {
    pub fn invalid_group(group: GroupId, message: impl Into<String>) -> Self {
        Self::InvalidGroup {
            group,
            message: message.into(),
        }
    }

    pub fn duplicate(id: impl ToString) -> Self {
        Self::DuplicateId(id.to_string())
    }

    pub fn invalid_order(message: impl Into<String>) -> Self {
        Self::InvalidOrder(message.into())
    }
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
