//! Error types for the contactload pipelines.
//!
//! - [`SourceError`] - opening and reading the CSV export
//! - [`MappingError`] - loading and checking a destination column mapping
//! - [`PipelineError`] - top-level transform / summary orchestration
//!
//! Malformed cell values are not errors: the normalizers turn them into `NULL`.
//! Error conversion is automatic via `From` implementations, allowing `?` to work
//! across error boundaries.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Source Errors
// =============================================================================

/// Errors while reading the contact export.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The file does not exist or cannot be opened.
    #[error("Cannot open source file '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Framing error or I/O failure in the middle of the file.
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The file has no header line at all.
    #[error("CSV file is empty (no header row)")]
    NoHeaders,

    /// The header does not name every expected field.
    #[error("Header is missing expected field(s): {}", missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },
}

// =============================================================================
// Mapping Errors
// =============================================================================

/// Errors from a destination column mapping.
#[derive(Debug, Error)]
pub enum MappingError {
    /// Failed to read the mapping file.
    #[error("Cannot read mapping file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Mapping file is not valid JSON for a mapping.
    #[error("Invalid mapping JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// No destination columns.
    #[error("Mapping has no columns")]
    Empty,

    /// Same destination column listed twice.
    #[error("Duplicate destination column: {0}")]
    DuplicateColumn(String),

    /// Column sets more than one of `source`, `value` and `derive`.
    #[error("Column '{0}' must set only one of source, value or derive")]
    ConflictingSources(String),

    /// Table or column name that cannot be emitted unquoted.
    #[error("Invalid SQL identifier: '{0}'")]
    InvalidIdentifier(String),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level errors returned by [`crate::transform::run_transform`] and
/// [`crate::summary::run_summary`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Source reading error.
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Mapping error.
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// Cannot create the SQL output file.
    #[error("Cannot create output file '{}': {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Batch size of zero.
    #[error("Batch size must be at least 1")]
    InvalidBatchSize,

    /// Write failure on the output or report stream.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Report serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type for mapping operations.
pub type MappingResult<T> = Result<T, MappingError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
