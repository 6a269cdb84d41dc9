//! Reconciliation engine
//!
//! Decides per field and per reviewed row whether the manual, document and AI
//! values disagree enough to need a human decision.
//!
//! Evaluation order (first match wins):
//!
//! | mode        | has_manual | document | ai      | needs review          |
//! |-------------|------------|----------|---------|-----------------------|
//! | MANUAL_ONLY | false      | any      | any     | false                 |
//! | MANUAL_ONLY | true       | absent   | any     | false                 |
//! | MANUAL_ONLY | true       | present  | any     | manual != document    |
//! | STANDARD    | true       | absent   | any     | true                  |
//! | STANDARD    | true       | present  | any     | manual != document    |
//! | STANDARD    | false      | absent   | any     | true                  |
//! | STANDARD    | false      | present  | absent  | false                 |
//! | STANDARD    | false      | present  | present | document != ai        |
//!
//! Comparisons are tri-state: an absent manual value differs from a present
//! document value.

use crate::review::field_policy::{FieldPolicy, ReconciliationMode};
use crate::types::Observed;
use dossier_common::ReviewSettings;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

static DEFAULT_POLICY: Lazy<FieldPolicy> =
    Lazy::new(|| FieldPolicy::from_settings(&ReviewSettings::default()));

/// The three value sources of one field in one row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldObservation {
    pub manual: Observed,
    pub document: Observed,
    pub ai: Observed,
    /// A human touched the field, even if they cleared it back to absent
    pub has_manual: bool,
}

impl FieldObservation {
    pub fn new(
        manual: impl Into<Observed>,
        document: impl Into<Observed>,
        ai: impl Into<Observed>,
        has_manual: bool,
    ) -> Self {
        Self {
            manual: manual.into(),
            document: document.into(),
            ai: ai.into(),
            has_manual,
        }
    }
}

/// Decide for a known mode
pub fn decide(mode: ReconciliationMode, obs: &FieldObservation) -> bool {
    match mode {
        ReconciliationMode::ManualOnly => {
            obs.has_manual && obs.document.is_present() && obs.manual != obs.document
        }
        ReconciliationMode::Standard => {
            if obs.document.is_absent() {
                return true;
            }
            if obs.has_manual {
                return obs.manual != obs.document;
            }
            obs.ai.is_present() && obs.document != obs.ai
        }
    }
}

/// Needs-review flag with the default field policy table
pub fn calc_needs_review(
    manual: Observed,
    document: Observed,
    ai: Observed,
    has_manual: bool,
    field_name: &str,
) -> bool {
    let obs = FieldObservation {
        manual,
        document,
        ai,
        has_manual,
    };
    decide(DEFAULT_POLICY.mode_for(field_name), &obs)
}

/// One reviewed row (a function of the system under review) with its fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRow {
    pub function: String,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldObservation>,
}

/// Per-field flags for one row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowReview {
    pub function: String,
    pub flags: BTreeMap<String, bool>,
    pub needs_review: bool,
}

/// Flags for a whole table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewSummary {
    pub rows: Vec<RowReview>,
    pub rows_needing_review: usize,
    pub flagged_fields: usize,
}

/// Applies a field policy to observations
#[derive(Debug, Clone)]
pub struct ReviewEngine {
    policy: FieldPolicy,
}

impl ReviewEngine {
    pub fn new(policy: FieldPolicy) -> Self {
        Self { policy }
    }

    pub fn from_settings(settings: &ReviewSettings) -> Self {
        Self::new(FieldPolicy::from_settings(settings))
    }

    pub fn policy(&self) -> &FieldPolicy {
        &self.policy
    }

    pub fn needs_review(&self, field_name: &str, obs: &FieldObservation) -> bool {
        decide(self.policy.mode_for(field_name), obs)
    }

    pub fn review_row(&self, row: &FunctionRow) -> RowReview {
        let flags: BTreeMap<String, bool> = row
            .fields
            .iter()
            .map(|(name, obs)| (name.clone(), self.needs_review(name, obs)))
            .collect();
        let needs_review = flags.values().any(|flag| *flag);

        RowReview {
            function: row.function.clone(),
            flags,
            needs_review,
        }
    }

    pub fn review_rows(&self, rows: &[FunctionRow]) -> ReviewSummary {
        let rows: Vec<RowReview> = rows.iter().map(|row| self.review_row(row)).collect();
        let rows_needing_review = rows.iter().filter(|r| r.needs_review).count();
        let flagged_fields = rows
            .iter()
            .map(|r| r.flags.values().filter(|flag| **flag).count())
            .sum();

        tracing::debug!(
            "Reviewed {} row(s): {} need review, {} field(s) flagged",
            rows.len(),
            rows_needing_review,
            flagged_fields
        );

        ReviewSummary {
            rows,
            rows_needing_review,
            flagged_fields,
        }
    }
}

impl Default for ReviewEngine {
    /// Engine with the compiled-in field table, same as [`calc_needs_review`]
    fn default() -> Self {
        Self::new(DEFAULT_POLICY.clone())
    }
}
