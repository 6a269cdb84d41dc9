//! dossier-intake library interface
//!
//! Attachment intake (slot classification, staging, submission gate) and
//! field review (needs-review decision across manual, document and AI values).

pub mod config;
pub mod error;
pub mod review;
pub mod services;
pub mod types;

pub use crate::error::{IntakeError, IntakeResult};
pub use crate::review::{calc_needs_review, FieldObservation, FieldPolicy, ReconciliationMode, ReviewEngine};
pub use crate::services::{detect_slot, IntakeValidator, UploadClassifier, UploadError};
pub use crate::types::{Observed, SlotRange, UploadCandidate};
