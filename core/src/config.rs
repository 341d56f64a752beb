//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;

/// Caps and switches shared by the enumeration and mutation layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum distinct variants enumerated per entity.
    pub variant_cap_per_action: usize,
    /// Maximum candidate sets examined per entity, valid or not.
    pub candidate_budget_per_action: usize,
    /// Maximum choices enumerated per group.
    pub group_combo_cap: usize,
    /// Maximum undo entries kept; the oldest are trimmed first.
    pub history_limit: usize,
    /// Reserved phase at which self-mode outcomes mirror onto the swapped row.
    pub dual_phase: String,
    /// Leave the pair table and index out of undo snapshots.
    pub exclude_derived_from_snapshots: bool,
    /// Restore the document when a transaction callback fails.
    pub rollback_on_error: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            variant_cap_per_action: 256,
            candidate_budget_per_action: 1 << 16,
            group_combo_cap: 1024,
            history_limit: 100,
            dual_phase: "outcome".to_string(),
            exclude_derived_from_snapshots: true,
            rollback_on_error: true,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> CoreResult<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn with_variant_cap(mut self, cap: usize) -> Self {
        self.variant_cap_per_action = cap;
        self
    }

    pub fn with_candidate_budget(mut self, budget: usize) -> Self {
        self.candidate_budget_per_action = budget;
        self
    }

    pub fn with_group_combo_cap(mut self, cap: usize) -> Self {
        self.group_combo_cap = cap;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_dual_phase(mut self, phase: impl Into<String>) -> Self {
        self.dual_phase = phase.into();
        self
    }

    pub fn with_derived_in_snapshots(mut self, include: bool) -> Self {
        self.exclude_derived_from_snapshots = !include;
        self
    }

    pub fn with_rollback_on_error(mut self, enabled: bool) -> Self {
        self.rollback_on_error = enabled;
        self
    }
}
