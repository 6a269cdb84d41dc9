//! Intake validator
//!
//! Owns the files staged for one submission. Every mutation (`add`, `remove`,
//! `set_slot`) recomputes duplicate/missing status before returning, so the
//! state observed by callers is always consistent.

use crate::error::{IntakeError, IntakeResult};
use crate::services::upload_classifier::{detect_slot, UploadClassifier, UploadError, ValidationOutcome};
use crate::types::UploadCandidate;
use chrono::{DateTime, Utc};
use dossier_common::IntakeSettings;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

const MISSING_WARNING: &str = "Please assign a unique attachment number to every file.";
const DUPLICATE_WARNING: &str = "Several files share the same attachment number.";

/// Per-entry status after the last recompute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    Ok,
    /// Another entry resolves to the same slot
    Duplicate,
    /// No slot assigned
    Missing,
}

/// A pending upload
#[derive(Debug, Clone, Serialize)]
pub struct StagedFile {
    pub id: Uuid,
    pub file: UploadCandidate,
    /// Slot found in the filename, if any
    pub detected_slot: Option<u8>,
    /// Effective slot (user-overridable)
    pub slot: Option<u8>,
    /// Validation result for the current `slot`
    pub validation: ValidationOutcome,
    pub status: EntryStatus,
    pub staged_at: DateTime<Utc>,
}

/// Snapshot returned by [`IntakeValidator::state`]
#[derive(Debug, Clone, Serialize)]
pub struct IntakeState {
    pub entries: Vec<StagedFile>,
    pub can_submit: bool,
    pub warning: Option<String>,
}

/// Staged file collection with submission gate
#[derive(Debug, Clone)]
pub struct IntakeValidator {
    classifier: UploadClassifier,
    required_slots: Vec<u8>,
    entries: Vec<StagedFile>,
    can_submit: bool,
    warning: Option<String>,
}

impl IntakeValidator {
    pub fn new(classifier: UploadClassifier) -> Self {
        Self {
            classifier,
            required_slots: Vec::new(),
            entries: Vec::new(),
            can_submit: true,
            warning: None,
        }
    }

    pub fn from_settings(settings: &IntakeSettings) -> Self {
        Self::new(UploadClassifier::from_settings(settings))
            .with_required_slots(settings.required_slots.clone())
    }

    /// Slots that must each be covered before submission
    pub fn with_required_slots(mut self, mut slots: Vec<u8>) -> Self {
        slots.sort_unstable();
        slots.dedup();
        self.required_slots = slots;
        self.recompute();
        self
    }

    /// Stage a file, resolving its slot from the filename
    pub fn add(&mut self, file: UploadCandidate) -> IntakeResult<Uuid> {
        self.add_with_slot(file, None)
    }

    /// Stage a file with a UI-selected fallback slot
    ///
    /// A file without any slot is staged as MISSING so the user can pick one.
    /// Every other validation failure rejects the file.
    pub fn add_with_slot(&mut self, file: UploadCandidate, ui_slot: Option<u8>) -> IntakeResult<Uuid> {
        let mut ui_slot = ui_slot;
        let validation = self.classifier.validate(&file, &mut ui_slot);

        let slot = match &validation.error {
            None => validation.slot,
            Some(UploadError::MissingSlotPattern) => None,
            Some(err) => {
                info!(file = %file.name, "Upload rejected: {}", err);
                return Err(err.clone().into());
            }
        };

        let id = Uuid::new_v4();
        info!(file = %file.name, id = %id, slot = ?slot, "File staged");

        self.entries.push(StagedFile {
            id,
            detected_slot: detect_slot(&file.name),
            file,
            slot,
            validation,
            status: EntryStatus::Ok,
            staged_at: Utc::now(),
        });
        self.recompute();

        Ok(id)
    }

    /// Drop a staged file
    pub fn remove(&mut self, id: Uuid) -> IntakeResult<StagedFile> {
        let idx = self.position(id)?;
        let removed = self.entries.remove(idx);
        debug!(file = %removed.file.name, id = %id, "File removed from staging");
        self.recompute();
        Ok(removed)
    }

    /// Override the slot of a staged file
    ///
    /// `None` clears the slot. A slot the file's type or the configured range
    /// does not allow is rejected and leaves the entry unchanged.
    pub fn set_slot(&mut self, id: Uuid, slot: Option<u8>) -> IntakeResult<()> {
        let idx = self.position(id)?;

        let validation = match slot {
            Some(n) => {
                let resolved = self.classifier.check(&self.entries[idx].file, Some(n))?;
                ValidationOutcome::accepted(resolved)
            }
            None => ValidationOutcome::rejected(None, UploadError::MissingSlotPattern),
        };

        let entry = &mut self.entries[idx];
        debug!(file = %entry.file.name, from = ?entry.slot, to = ?slot, "Slot override");
        entry.slot = slot;
        entry.validation = validation;

        self.recompute();
        Ok(())
    }

    /// Reclassify every entry and update the submission gate
    pub fn recompute(&mut self) {
        let mut counts: HashMap<u8, usize> = HashMap::new();
        for entry in &self.entries {
            if let Some(slot) = entry.slot {
                *counts.entry(slot).or_insert(0) += 1;
            }
        }

        let mut duplicates = 0;
        let mut missing = 0;
        for entry in &mut self.entries {
            entry.status = match entry.slot {
                None => {
                    missing += 1;
                    EntryStatus::Missing
                }
                Some(slot) if counts[&slot] > 1 => {
                    duplicates += 1;
                    EntryStatus::Duplicate
                }
                Some(_) => EntryStatus::Ok,
            };
        }

        let uncovered: Vec<u8> = self
            .required_slots
            .iter()
            .copied()
            .filter(|slot| !counts.contains_key(slot))
            .collect();

        let warning = if missing > 0 {
            Some(MISSING_WARNING.to_string())
        } else if duplicates > 0 {
            Some(DUPLICATE_WARNING.to_string())
        } else if !uncovered.is_empty() {
            let list: Vec<String> = uncovered.iter().map(|s| s.to_string()).collect();
            Some(format!("Missing attachments: {}", list.join(", ")))
        } else {
            None
        };

        let can_submit = warning.is_none();
        if can_submit != self.can_submit {
            info!(
                "Submission {} ({} staged, {} duplicate, {} missing)",
                if can_submit { "enabled" } else { "blocked" },
                self.entries.len(),
                duplicates,
                missing
            );
        }

        self.can_submit = can_submit;
        self.warning = warning;
    }

    pub fn can_submit(&self) -> bool {
        self.can_submit
    }

    pub fn entries(&self) -> &[StagedFile] {
        &self.entries
    }

    pub fn get(&self, id: Uuid) -> Option<&StagedFile> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn state(&self) -> IntakeState {
        IntakeState {
            entries: self.entries.clone(),
            can_submit: self.can_submit,
            warning: self.warning.clone(),
        }
    }

    /// Hand the staged files to the uploader and clear the collection
    pub fn take_for_submit(&mut self) -> IntakeResult<Vec<StagedFile>> {
        if self.entries.is_empty() {
            return Err(IntakeError::NotSubmittable("no files staged".to_string()));
        }
        if !self.can_submit {
            let reason = self.warning.clone().unwrap_or_default();
            return Err(IntakeError::NotSubmittable(reason));
        }

        let files = std::mem::take(&mut self.entries);
        info!("Submitting {} staged file(s)", files.len());
        self.recompute();
        Ok(files)
    }

    fn position(&self, id: Uuid) -> IntakeResult<usize> {
        self.entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(IntakeError::UnknownEntry(id))
    }
}

impl Default for IntakeValidator {
    fn default() -> Self {
        Self::new(UploadClassifier::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DOCX_MIME, PDF_MIME};

    fn docx(name: &str) -> UploadCandidate {
        UploadCandidate::new(name, 2048, DOCX_MIME)
    }

    fn statuses(validator: &IntakeValidator) -> Vec<EntryStatus> {
        validator.entries().iter().map(|e| e.status).collect()
    }

    #[test]
    fn test_empty_validator_is_submittable() {
        let validator = IntakeValidator::default();
        assert!(validator.can_submit());
        assert!(validator.state().warning.is_none());
    }

    #[test]
    fn test_duplicate_and_missing_detection() {
        let mut validator = IntakeValidator::default();
        validator.add(docx("Anlage_1.docx")).unwrap();
        validator.add(docx("Anlage_2.docx")).unwrap();
        validator.add(docx("Anlage-2 copy.docx")).unwrap();
        validator.add(docx("contract.docx")).unwrap();

        assert_eq!(
            statuses(&validator),
            vec![
                EntryStatus::Ok,
                EntryStatus::Duplicate,
                EntryStatus::Duplicate,
                EntryStatus::Missing
            ]
        );
        let state = validator.state();
        assert!(!state.can_submit);
        assert_eq!(state.warning.as_deref(), Some(MISSING_WARNING));
    }

    #[test]
    fn test_duplicate_warning_without_missing() {
        let mut validator = IntakeValidator::default();
        validator.add(docx("Anlage_2.docx")).unwrap();
        validator.add(docx("anlage2_v2.docx")).unwrap();
        assert_eq!(validator.state().warning.as_deref(), Some(DUPLICATE_WARNING));
    }

    #[test]
    fn test_rejected_file_is_not_staged() {
        let mut validator = IntakeValidator::default();
        let result = validator.add(UploadCandidate::new("Anlage_2.pdf", 10, PDF_MIME));
        assert!(matches!(
            result,
            Err(IntakeError::Upload(UploadError::UnsupportedType { .. }))
        ));
        assert!(validator.is_empty());
    }

    #[test]
    fn test_set_slot_resolves_missing() {
        let mut validator = IntakeValidator::default();
        let id = validator.add(docx("contract.docx")).unwrap();
        assert!(!validator.can_submit());

        validator.set_slot(id, Some(4)).unwrap();
        let entry = validator.get(id).unwrap();
        assert_eq!(entry.slot, Some(4));
        assert_eq!(entry.detected_slot, None);
        assert!(entry.validation.ok);
        assert!(validator.can_submit());
    }

    #[test]
    fn test_set_slot_rejects_incompatible_type() {
        let mut validator = IntakeValidator::default();
        let id = validator
            .add(UploadCandidate::new("Anlage_3.pdf", 10, PDF_MIME))
            .unwrap();

        let err = validator.set_slot(id, Some(2)).unwrap_err();
        assert!(matches!(err, IntakeError::Upload(UploadError::UnsupportedType { .. })));
        assert_eq!(validator.get(id).unwrap().slot, Some(3));
    }

    #[test]
    fn test_set_slot_rejects_out_of_range() {
        let mut validator = IntakeValidator::default();
        let id = validator.add(docx("Anlage_1.docx")).unwrap();
        let err = validator.set_slot(id, Some(9)).unwrap_err();
        assert!(matches!(err, IntakeError::Upload(UploadError::InvalidSlotForFile(9))));
    }

    #[test]
    fn test_clearing_slot_marks_missing() {
        let mut validator = IntakeValidator::default();
        let id = validator.add(docx("Anlage_1.docx")).unwrap();
        validator.set_slot(id, None).unwrap();
        assert_eq!(statuses(&validator), vec![EntryStatus::Missing]);
        assert!(!validator.can_submit());
    }

    #[test]
    fn test_remove_unblocks_submission() {
        let mut validator = IntakeValidator::default();
        validator.add(docx("Anlage_5.docx")).unwrap();
        let dup = validator.add(docx("Anlage_5 (1).docx")).unwrap();
        assert!(!validator.can_submit());

        let removed = validator.remove(dup).unwrap();
        assert_eq!(removed.id, dup);
        assert!(validator.can_submit());
        assert_eq!(statuses(&validator), vec![EntryStatus::Ok]);
    }

    #[test]
    fn test_unknown_entry() {
        let mut validator = IntakeValidator::default();
        let id = Uuid::new_v4();
        assert!(matches!(validator.remove(id), Err(IntakeError::UnknownEntry(_))));
        assert!(matches!(validator.set_slot(id, Some(1)), Err(IntakeError::UnknownEntry(_))));
    }

    #[test]
    fn test_required_slots_block_submission() {
        let mut validator = IntakeValidator::default().with_required_slots(vec![1, 2]);
        validator.add(docx("Anlage_1.docx")).unwrap();
        let state = validator.state();
        assert!(!state.can_submit);
        assert_eq!(state.warning.as_deref(), Some("Missing attachments: 2"));

        validator.add(docx("Anlage_2.docx")).unwrap();
        assert!(validator.can_submit());
    }

    #[test]
    fn test_take_for_submit() {
        let mut validator = IntakeValidator::default();
        assert!(matches!(
            validator.take_for_submit(),
            Err(IntakeError::NotSubmittable(_))
        ));

        validator.add(docx("Anlage_1.docx")).unwrap();
        let files = validator.take_for_submit().unwrap();
        assert_eq!(files.len(), 1);
        assert!(validator.is_empty());
    }
}
