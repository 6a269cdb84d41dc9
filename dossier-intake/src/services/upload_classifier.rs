//! Upload classifier
//!
//! Infers the attachment slot ("Anlage" number) from a filename and validates
//! a file against the slot-specific type and size rules.
//!
//! Slot 3 accepts DOCX or PDF; every other slot (and a file whose slot is
//! still unknown) accepts DOCX only.

use crate::types::{SlotRange, UploadCandidate, DOCX_MIME, MSWORD_MIME, PDF_MIME};
use dossier_common::IntakeSettings;
use serde::Serialize;
use thiserror::Error;

/// Filename token that introduces an attachment number
const SLOT_TOKEN: &str = "anlage";

/// The only slot that also accepts PDF
const PDF_SLOT: u8 = 3;

/// Upload validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail")]
pub enum UploadError {
    /// File exceeds the configured size limit
    #[error("File too large: {size} bytes (max {} MB)", .max / 1024 / 1024)]
    FileTooLarge { size: u64, max: u64 },

    /// Extension/MIME pair not allowed for the resolved slot
    #[error("{}", unsupported_type_message(.slot))]
    UnsupportedType {
        slot: Option<u8>,
        extension: String,
        mime_type: String,
    },

    /// Neither the filename nor the UI supplied a slot
    #[error("No attachment number found in file name")]
    MissingSlotPattern,

    /// Slot resolved but outside the valid range
    #[error("Invalid attachment number: {0}")]
    InvalidSlotForFile(u8),
}

fn unsupported_type_message(slot: &Option<u8>) -> String {
    match *slot {
        Some(PDF_SLOT) => format!("Only .docx or .pdf allowed for attachment {}", PDF_SLOT),
        _ => "Only .docx files allowed".to_string(),
    }
}

/// Result of [`UploadClassifier::validate`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub ok: bool,
    /// Slot the file resolved to (filename first, then UI)
    pub slot: Option<u8>,
    pub error: Option<UploadError>,
}

impl ValidationOutcome {
    pub fn accepted(slot: u8) -> Self {
        Self {
            ok: true,
            slot: Some(slot),
            error: None,
        }
    }

    pub fn rejected(slot: Option<u8>, error: UploadError) -> Self {
        Self {
            ok: false,
            slot,
            error: Some(error),
        }
    }

    pub fn into_result(self) -> Result<u8, UploadError> {
        match (self.error, self.slot) {
            (Some(err), _) => Err(err),
            (None, Some(slot)) => Ok(slot),
            (None, None) => Err(UploadError::MissingSlotPattern),
        }
    }
}

/// Server-side routing decision for a single upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "slot", rename_all = "snake_case")]
pub enum SlotAssignment {
    /// Filename names a valid slot; the upload can be filed directly
    Assigned(u8),
    /// A human has to pick the slot
    Manual,
}

/// Extract the attachment number from a filename
///
/// Case-insensitive `anlage`, an optional single separator (whitespace, `_`
/// or `-`), then one digit. The first such occurrence decides. Digits 1-9 are
/// returned even when outside the configured range; `0` yields `None`.
pub fn detect_slot(filename: &str) -> Option<u8> {
    let lowered = filename.to_lowercase();

    let digit = lowered.match_indices(SLOT_TOKEN).find_map(|(idx, token)| {
        let mut rest = lowered[idx + token.len()..].chars();
        let mut next = rest.next()?;
        if next.is_whitespace() || next == '_' || next == '-' {
            next = rest.next()?;
        }
        next.to_digit(10)
    })?;

    (1..=9).contains(&digit).then_some(digit as u8)
}

/// Classifies and validates uploads against the configured slot rules
#[derive(Debug, Clone)]
pub struct UploadClassifier {
    max_upload_bytes: u64,
    slots: SlotRange,
}

impl UploadClassifier {
    pub fn new(max_upload_bytes: u64, slots: SlotRange) -> Self {
        Self {
            max_upload_bytes,
            slots,
        }
    }

    pub fn from_settings(settings: &IntakeSettings) -> Self {
        Self::new(settings.max_upload_bytes, SlotRange::from(settings))
    }

    /// Route an upload by filename alone
    pub fn classify(&self, filename: &str) -> SlotAssignment {
        match detect_slot(filename) {
            Some(slot) if self.slots.contains(slot) => SlotAssignment::Assigned(slot),
            _ => SlotAssignment::Manual,
        }
    }

    /// Validate a file, resolving its slot from the filename or the UI
    ///
    /// The filename-derived slot wins over `ui_slot`. On success an empty
    /// `ui_slot` is filled with the filename-derived slot; an explicit UI
    /// choice is never overwritten.
    pub fn validate(&self, file: &UploadCandidate, ui_slot: &mut Option<u8>) -> ValidationOutcome {
        let from_name = detect_slot(&file.name);
        let slot = from_name.or(*ui_slot);

        let outcome = match self.check(file, slot) {
            Ok(slot) => {
                if ui_slot.is_none() {
                    *ui_slot = from_name;
                }
                ValidationOutcome::accepted(slot)
            }
            Err(err) => ValidationOutcome::rejected(slot, err),
        };

        tracing::debug!(
            file = %file.name,
            filename_slot = ?from_name,
            slot = ?outcome.slot,
            error = ?outcome.error,
            "Validated upload"
        );

        outcome
    }

    /// Check a file against the rules for an already resolved slot
    ///
    /// Order: size, type, slot presence, slot range.
    pub fn check(&self, file: &UploadCandidate, slot: Option<u8>) -> Result<u8, UploadError> {
        if file.size > self.max_upload_bytes {
            return Err(UploadError::FileTooLarge {
                size: file.size,
                max: self.max_upload_bytes,
            });
        }

        if !type_allowed(file, slot) {
            return Err(UploadError::UnsupportedType {
                slot,
                extension: file.extension(),
                mime_type: file.mime_type.clone(),
            });
        }

        let slot = slot.ok_or(UploadError::MissingSlotPattern)?;

        if !self.slots.contains(slot) {
            return Err(UploadError::InvalidSlotForFile(slot));
        }

        Ok(slot)
    }
}

impl Default for UploadClassifier {
    fn default() -> Self {
        Self::from_settings(&IntakeSettings::default())
    }
}

fn type_allowed(file: &UploadCandidate, slot: Option<u8>) -> bool {
    let ext = file.extension();
    let mime = file.mime_type.as_str();
    let is_docx_mime = mime == DOCX_MIME || mime == MSWORD_MIME;

    if slot == Some(PDF_SLOT) {
        matches!(ext.as_str(), "docx" | "pdf") && (is_docx_mime || mime == PDF_MIME)
    } else {
        ext == "docx" && is_docx_mime
    }
}
