//! Intake services
//!
//! - [`upload_classifier`]: slot detection and per-file validation
//! - [`intake_validator`]: staged file collection and submission gate

pub mod intake_validator;
pub mod upload_classifier;

pub use intake_validator::{EntryStatus, IntakeState, IntakeValidator, StagedFile};
pub use upload_classifier::{detect_slot, SlotAssignment, UploadClassifier, UploadError, ValidationOutcome};
