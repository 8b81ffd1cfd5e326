// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Every failure the library can surface to a caller, as one
// typed enum. The CLI layer converts these into user-visible
// messages; nothing here panics or exits.
//
// Grouping:
//   - catalog errors:  Validation, NotFound, StoreUnavailable
//   - encoder errors:  UnknownCategory, InvalidCode
//   - pipeline errors: ModelNotTrained, InsufficientData, Training
//   - artifact errors: ArtifactNotFound, ArtifactMismatch
//   - wrapped I/O and (de)serialization failures
//
// All of these are recoverable at the request boundary: a failed
// operation leaves previously persisted state untouched.
//
// Reference: Rust Book §9 (Error Handling)

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A user-entered field is missing or cannot be converted
    /// to its expected type (e.g. "abc" where an integer goes).
    #[error("invalid field '{field}': {reason}")]
    Validation { field: String, reason: String },

    /// No catalog record exists with the given id.
    #[error("record {0} not found")]
    NotFound(u64),

    /// The backing catalog resource is missing or unreadable
    /// and the store was not configured to create a default.
    #[error("catalog resource unavailable: '{}'", .0.display())]
    StoreUnavailable(PathBuf),

    /// A category label is outside the fitted encoder domain.
    /// Callers must surface this, never substitute a default code.
    #[error("unknown category '{0}' — not seen during training")]
    UnknownCategory(String),

    /// A category code is outside the fitted encoder range.
    #[error("invalid category code {code} (domain size {domain_size})")]
    InvalidCode { code: usize, domain_size: usize },

    /// Predict was requested but no model/encoder pair is persisted.
    #[error("no trained model found — run `train` first")]
    ModelNotTrained,

    /// Train was requested but no usable rows remain after
    /// dropping records with missing required fields.
    #[error("not enough usable rows to train a model")]
    InsufficientData,

    /// The underlying model fit failed.
    #[error("training failed: {0}")]
    Training(String),

    /// The named artifact slot is empty.
    #[error("artifact '{0}' not found")]
    ArtifactNotFound(String),

    /// The model and encoder artifacts carry different version
    /// tags — they were not produced by the same training run.
    #[error("artifact pair out of sync (model {model}, encoder {encoder}) — retrain")]
    ArtifactMismatch { model: String, encoder: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for a field validation failure.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
