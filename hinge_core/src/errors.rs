//! # Error Types
//!
//! Structured error types for hinge_core. Each variant carries enough context
//! to report a failed variant in a batch summary without re-reading logs.
//!
//! The variants group into four families:
//!
//! - **Input validation**: [`CalcError::InvalidInput`], [`CalcError::MissingField`]
//! - **Section lookup**: [`CalcError::SectionNotFound`], [`CalcError::LookupFailed`]
//! - **Persistence**: [`CalcError::ModelFileNotFound`], [`CalcError::FileError`],
//!   [`CalcError::FileLocked`]
//! - **Export**: [`CalcError::ExportFailed`]
//!
//! ## Example
//!
//! ```rust
//! use hinge_core::errors::{CalcError, CalcResult};
//!
//! fn validate_fy(fy_mpa: f64) -> CalcResult<()> {
//!     if fy_mpa <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "fy_mpa",
//!             fy_mpa.to_string(),
//!             "Yield strength must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert_eq!(validate_fy(-1.0).unwrap_err().error_code(), "INVALID_INPUT");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for hinge_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation, lookup and persistence operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (non-positive, out of range, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Section name unknown to the section source
    #[error("Section not found: {section_name}")]
    SectionNotFound { section_name: String },

    /// Section source answered with a non-success status
    #[error("Section lookup failed for '{section_name}' with status {status}")]
    LookupFailed { section_name: String, status: i32 },

    /// Target model text file does not exist
    #[error("Model file not found: '{path}'")]
    ModelFileNotFound { path: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another process
    #[error("File locked: '{path}' is locked by {locked_by}")]
    FileLocked { path: String, locked_by: String },

    /// Results sink could not write
    #[error("Export failed for '{path}': {reason}")]
    ExportFailed { path: String, reason: String },

    /// JSON/CSV serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Session schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a SectionNotFound error
    pub fn section_not_found(section_name: impl Into<String>) -> Self {
        CalcError::SectionNotFound {
            section_name: section_name.into(),
        }
    }

    /// Create a LookupFailed error
    pub fn lookup_failed(section_name: impl Into<String>, status: i32) -> Self {
        CalcError::LookupFailed {
            section_name: section_name.into(),
            status,
        }
    }

    /// Create a ModelFileNotFound error
    pub fn model_file_not_found(path: impl Into<String>) -> Self {
        CalcError::ModelFileNotFound { path: path.into() }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>) -> Self {
        CalcError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
        }
    }

    /// Create an ExportFailed error
    pub fn export_failed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::ExportFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::FileLocked { .. })
    }

    /// True for errors that should be rejected before any calculation runs.
    pub fn is_input_error(&self) -> bool {
        matches!(self, CalcError::InvalidInput { .. } | CalcError::MissingField { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::SectionNotFound { .. } => "SECTION_NOT_FOUND",
            CalcError::LookupFailed { .. } => "LOOKUP_FAILED",
            CalcError::ModelFileNotFound { .. } => "MODEL_FILE_NOT_FOUND",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::FileLocked { .. } => "FILE_LOCKED",
            CalcError::ExportFailed { .. } => "EXPORT_FAILED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}
