//! Review of multi-source field values
//!
//! - [`field_policy`]: which comparison applies to a field
//! - [`reconciliation`]: the needs-review decision per field and row

pub mod field_policy;
pub mod reconciliation;

pub use field_policy::{FieldPolicy, ReconciliationMode};
pub use reconciliation::{
    calc_needs_review, decide, FieldObservation, FunctionRow, ReviewEngine, ReviewSummary, RowReview,
};
