//! Error types for dossier-intake
//!
//! Upload rule violations live in [`UploadError`]; this module wraps them
//! together with staging errors.

use crate::services::upload_classifier::UploadError;
use thiserror::Error;
use uuid::Uuid;

/// Intake staging error
#[derive(Debug, Error)]
pub enum IntakeError {
    /// No staged entry with this id
    #[error("Unknown staged entry: {0}")]
    UnknownEntry(Uuid),

    /// File rejected by the upload rules
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Submission attempted while the gate is closed
    #[error("Submission blocked: {0}")]
    NotSubmittable(String),
}

/// Result type for intake operations
pub type IntakeResult<T> = Result<T, IntakeError>;
