//! Core types shared by intake and review
//!
//! - [`UploadCandidate`]: a selected file before it is staged
//! - [`SlotRange`]: the configured attachment numbers
//! - [`Observed`]: tri-state field value (absent / present false / present true)

use dossier_common::{Error, IntakeSettings, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

// ============================================================================
// Upload Types
// ============================================================================

/// MIME type for Word documents (OOXML)
pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
/// MIME type for legacy Word documents, accepted alongside DOCX
pub const MSWORD_MIME: &str = "application/msword";
/// MIME type for PDF documents
pub const PDF_MIME: &str = "application/pdf";

/// A file selected or dropped for upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadCandidate {
    /// File name as supplied by the user (no directory part)
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// MIME type reported for the file
    pub mime_type: String,
}

impl UploadCandidate {
    pub fn new(name: impl Into<String>, size: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
        }
    }

    /// Build a candidate from a file on disk
    ///
    /// The MIME type is sniffed from magic bytes. DOCX files are ZIP
    /// containers, so a generic ZIP (or unknown) result falls back to the
    /// extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(Error::InvalidInput(format!("Not a file: {}", path.display())));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::InvalidInput(format!("No file name: {}", path.display())))?;

        let sniffed = infer::get_from_path(path)?
            .map(|kind| kind.mime_type())
            .filter(|mime| *mime != "application/zip");

        let mime_type = match sniffed {
            Some(mime) => mime.to_string(),
            None => mime_from_extension(&name).to_string(),
        };

        tracing::debug!(file = %name, size = metadata.len(), mime = %mime_type, "Read upload candidate");

        Ok(Self::new(name, metadata.len(), mime_type))
    }

    /// Lowercased text after the last `.`; the whole name when there is none
    pub fn extension(&self) -> String {
        self.name
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }
}

fn mime_from_extension(name: &str) -> &'static str {
    let ext = name.rsplit('.').next().unwrap_or_default().to_lowercase();
    match ext.as_str() {
        "docx" => DOCX_MIME,
        "doc" => MSWORD_MIME,
        "pdf" => PDF_MIME,
        _ => "application/octet-stream",
    }
}

/// Inclusive range of valid attachment numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRange {
    pub min: u8,
    pub max: u8,
}

impl SlotRange {
    pub fn contains(&self, slot: u8) -> bool {
        (self.min..=self.max).contains(&slot)
    }
}

impl Default for SlotRange {
    fn default() -> Self {
        Self { min: 1, max: 6 }
    }
}

impl From<&IntakeSettings> for SlotRange {
    fn from(settings: &IntakeSettings) -> Self {
        Self {
            min: settings.min_slot,
            max: settings.max_slot,
        }
    }
}

// ============================================================================
// Review Types
// ============================================================================

/// Tri-state field value
///
/// `Absent` is distinct from `Present(false)`: a document that says "no" is
/// not the same as a document that says nothing. Serialized as JSON
/// `null` / `false` / `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum Observed {
    #[default]
    Absent,
    Present(bool),
}

impl Observed {
    pub fn is_absent(self) -> bool {
        matches!(self, Observed::Absent)
    }

    pub fn is_present(self) -> bool {
        !self.is_absent()
    }

    pub fn as_option(self) -> Option<bool> {
        match self {
            Observed::Absent => None,
            Observed::Present(v) => Some(v),
        }
    }
}

impl From<Option<bool>> for Observed {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(v) => Observed::Present(v),
            None => Observed::Absent,
        }
    }
}

impl From<bool> for Observed {
    fn from(value: bool) -> Self {
        Observed::Present(value)
    }
}

impl From<Observed> for Option<bool> {
    fn from(value: Observed) -> Self {
        value.as_option()
    }
}

impl fmt::Display for Observed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Observed::Absent => write!(f, "-"),
            Observed::Present(v) => write!(f, "{}", v),
        }
    }
}
