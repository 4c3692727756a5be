//! # contactload - CRM contact export to SQL, plus data summaries
//!
//! Reads a HubSpot-style contact export and either writes batched
//! `INSERT INTO personal_contacts` statements or prints descriptive statistics.
//!
//! ## Architecture
//!
//! ```text
//!                      ┌────────────┐     ┌──────────────┐     ┌──────────────┐
//!                 ┌───▶│ Normalizer │────▶│ Batch Emitter│────▶│  .sql file   │
//! ┌────────────┐  │    │ + Mapping  │     │ (1000 / stmt)│     │              │
//! │  CSV file  │──┤    └────────────┘     └──────────────┘     └──────────────┘
//! │ (UTF-8/BOM)│  │    ┌────────────┐     ┌──────────────┐
//! └────────────┘  └───▶│ Aggregator │────▶│   Summary    │────▶ stdout
//!                      └────────────┘     └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use contactload::{run_transform, TransformOptions};
//! use std::path::Path;
//!
//! let stats = run_transform(
//!     Path::new("contacts.csv"),
//!     Path::new("contacts.sql"),
//!     &TransformOptions::default(),
//! )?;
//! println!("{} rows, {} statements", stats.rows, stats.statements);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per layer
//! - [`logs`] - Diagnostic stream (stderr)
//! - [`models`] - Raw records, SQL literals, destination rows
//! - [`parser`] - CSV reader with header resolution
//! - [`transform`] - Normalizers, column mapping, batching, progress
//! - [`summary`] - Aggregation and report rendering

// Core modules
pub mod error;
pub mod logs;
pub mod models;

// Reading
pub mod parser;

// Pipelines
pub mod summary;
pub mod transform;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{MappingError, PipelineError, SourceError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{DestinationRow, NormalizedValue, RawRecord, SourceField, SqlLiteral};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{count_records, count_rows, open_source, ContactReader, HeaderLayout};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    clean_number, clean_phone, clean_text, derive_tags, parse_date, run_transform, BatchEmitter,
    ColumnMapping, ColumnSpec, Derivation, Normalizer, RecordTransformer, TransformOptions,
    TransformStats,
};

// =============================================================================
// Re-exports - Summary
// =============================================================================

pub use summary::{run_summary, Aggregator, FrequencyTable, SummaryOptions, SummaryReport};
