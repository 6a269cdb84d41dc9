//! Field policy table
//!
//! Maps a field name to the reconciliation mode used by
//! [`crate::review::reconciliation`]. Unknown fields use
//! [`ReconciliationMode::Standard`] so newly added fields work without a
//! table update.

use dossier_common::ReviewSettings;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How the three value sources of a field are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReconciliationMode {
    /// Field has parser and AI signal
    #[default]
    Standard,
    /// Field has no parser/AI signal; only manual vs. document matters
    ManualOnly,
}

/// Field name → reconciliation mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPolicy {
    modes: HashMap<String, ReconciliationMode>,
}

impl FieldPolicy {
    /// Empty table: every field is STANDARD
    pub fn new() -> Self {
        Self {
            modes: HashMap::new(),
        }
    }

    pub fn from_settings(settings: &ReviewSettings) -> Self {
        settings
            .manual_only_fields
            .iter()
            .fold(Self::new(), |policy, field| {
                policy.with_mode(field.clone(), ReconciliationMode::ManualOnly)
            })
    }

    pub fn with_mode(mut self, field: impl Into<String>, mode: ReconciliationMode) -> Self {
        self.modes.insert(field.into(), mode);
        self
    }

    pub fn mode_for(&self, field: &str) -> ReconciliationMode {
        self.modes.get(field).copied().unwrap_or_default()
    }
}
