//! # Error Types
//!
//! Structured error types for section_core. Every failure carries enough
//! context to be reported to an engineer (which file, which segment, which
//! material) and serializes to JSON for tooling.
//!
//! ## Example
//!
//! ```rust
//! use section_core::errors::{SectionError, SectionResult};
//!
//! fn validate_degrees(degrees_per_segment: f64) -> SectionResult<()> {
//!     if degrees_per_segment <= 0.0 {
//!         return Err(SectionError::invalid_input(
//!             "degrees_per_segment",
//!             degrees_per_segment.to_string(),
//!             "must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for section_core operations
pub type SectionResult<T> = Result<T, SectionError>;

/// Structured error type for import, analysis and project operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum SectionError {
    /// An input value is invalid (out of range, non-finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Material not found in the registry
    #[error("Material not found: {material_name}")]
    MaterialNotFound { material_name: String },

    /// A bulge segment whose endpoints coincide (zero chord length)
    #[error("Degenerate segment: endpoints coincide at ({x}, {y})")]
    DegenerateSegment { x: f64, y: f64 },

    /// Component index or id does not exist in the component list
    #[error("Component not found: {reference}")]
    ComponentNotFound { reference: String },

    /// The outline file could not be turned into closed polygons
    #[error("Import failed for '{path}': {reason}")]
    ImportFailed { path: String, reason: String },

    /// Section properties could not be computed
    #[error("Analysis failed: {reason}")]
    AnalysisFailed { reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl SectionError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        SectionError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        SectionError::MissingField { field: field.into() }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(material_name: impl Into<String>) -> Self {
        SectionError::MaterialNotFound {
            material_name: material_name.into(),
        }
    }

    /// Create a DegenerateSegment error for a zero-length chord starting at `(x, y)`
    pub fn degenerate_segment(x: f64, y: f64) -> Self {
        SectionError::DegenerateSegment { x, y }
    }

    /// Create a ComponentNotFound error
    pub fn component_not_found(reference: impl Into<String>) -> Self {
        SectionError::ComponentNotFound {
            reference: reference.into(),
        }
    }

    /// Create an ImportFailed error
    pub fn import_failed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        SectionError::ImportFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an AnalysisFailed error
    pub fn analysis_failed(reason: impl Into<String>) -> Self {
        SectionError::AnalysisFailed { reason: reason.into() }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        SectionError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        SectionError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl ToString) -> Self {
        SectionError::SerializationError {
            reason: reason.to_string(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SectionError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            SectionError::InvalidInput { .. } => "INVALID_INPUT",
            SectionError::MissingField { .. } => "MISSING_FIELD",
            SectionError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            SectionError::DegenerateSegment { .. } => "DEGENERATE_SEGMENT",
            SectionError::ComponentNotFound { .. } => "COMPONENT_NOT_FOUND",
            SectionError::ImportFailed { .. } => "IMPORT_FAILED",
            SectionError::AnalysisFailed { .. } => "ANALYSIS_FAILED",
            SectionError::FileError { .. } => "FILE_ERROR",
            SectionError::FileLocked { .. } => "FILE_LOCKED",
            SectionError::SerializationError { .. } => "SERIALIZATION_ERROR",
            SectionError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}
