//! CSV export to SQL file pipeline.
//!
//! # Example
//!
//! ```rust,ignore
//! use contactload::transform::{run_transform, TransformOptions};
//! use std::path::Path;
//!
//! let stats = run_transform(
//!     Path::new("MasterD_NYCC.csv"),
//!     Path::new("personal_contacts_import.sql"),
//!     &TransformOptions::default(),
//! )?;
//! println!("{} rows in {} statements", stats.rows, stats.statements);
//! ```

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use super::batch::{BatchEmitter, EmitStats, DEFAULT_BATCH_SIZE};
use super::derive::Derivation;
use super::mapping::ColumnMapping;
use super::progress::ProgressReporter;
use super::record::RecordTransformer;
use crate::error::{PipelineError, PipelineResult};
use crate::logs::{log_error, log_info, log_info_indent, log_success, log_warning};
use crate::parser::{count_rows, open_source, ContactReader};

/// Options for the transform pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformOptions {
    /// Rows per INSERT statement
    pub batch_size: usize,

    /// JSON column mapping; the built-in `personal_contacts` layout when unset
    pub mapping_path: Option<PathBuf>,

    /// Stamp for `import_batch` columns; generated per run when unset
    pub batch_id: Option<String>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            mapping_path: None,
            batch_id: None,
        }
    }
}

/// Outcome of a completed transform run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformStats {
    /// Data rows counted before transforming
    pub precount: usize,
    /// Rows written as VALUES tuples
    pub rows: usize,
    /// INSERT statements written
    pub statements: usize,
    pub table: String,
    pub output: PathBuf,
    pub batch_id: String,
}

/// Two comment lines and a blank line at the top of the SQL file.
pub fn write_banner<W: Write>(out: &mut W, table: &str, source_name: &str) -> std::io::Result<()> {
    writeln!(out, "-- SQL INSERT statements for {} table", table)?;
    writeln!(out, "-- Generated from {}", source_name)?;
    writeln!(out)
}

/// Transform every remaining row of `reader` into INSERT statements on `out`.
///
/// The banner is not written here. Returns the writer so callers can inspect it.
pub fn write_statements<R: Read, W: Write>(
    reader: &mut ContactReader<R>,
    out: W,
    transformer: &RecordTransformer,
    batch_size: usize,
    progress: &mut ProgressReporter,
) -> PipelineResult<(W, EmitStats)> {
    if batch_size == 0 {
        return Err(PipelineError::InvalidBatchSize);
    }

    let mut emitter = BatchEmitter::new(out, transformer.mapping().insert_prefix(), batch_size);

    for record in reader.records() {
        let row = transformer.transform(&record?);
        if let Some(flush) = emitter.push(row)? {
            progress.report(flush.total_rows);
        }
    }

    let (out, stats, last) = emitter.finish()?;
    if let Some(flush) = last {
        progress.report(flush.total_rows);
    }
    Ok((out, stats))
}

/// Load the configured mapping and log what it cannot fill.
pub fn load_mapping(options: &TransformOptions) -> PipelineResult<ColumnMapping> {
    let mapping = match options.mapping_path {
        Some(ref path) => {
            log_info(format!("Using column mapping: {}", path.display()));
            ColumnMapping::from_file(path)?
        }
        None => ColumnMapping::default(),
    };

    let audit = mapping.audit();
    for column in &audit.always_null {
        log_warning(format!(
            "Column '{}' has no source field; it will always be NULL",
            column
        ));
    }
    for field in &audit.unused_fields {
        log_warning(format!("Export field '{}' is not mapped to any column", field));
    }

    Ok(mapping)
}

/// Run the whole transform: precount, header check, batches, banner.
///
/// The output file is only created once the header has been checked. If the
/// export turns out malformed halfway, statements already flushed stay in the
/// output file.
pub fn run_transform(
    input: &Path,
    output: &Path,
    options: &TransformOptions,
) -> PipelineResult<TransformStats> {
    if options.batch_size == 0 {
        return Err(PipelineError::InvalidBatchSize);
    }

    let mapping = load_mapping(options)?;
    let table = mapping.table.clone();
    let mut transformer = RecordTransformer::new(mapping);
    if let Some(ref batch_id) = options.batch_id {
        transformer = transformer.with_batch_id(batch_id.clone());
    }
    if transformer.mapping().derives(Derivation::ImportBatch) {
        log_info(format!("Import batch: {}", transformer.batch_id()));
    }

    log_info("Counting rows...");
    let precount = count_rows(input)?;
    log_info(format!("Total rows to process: {}", precount));

    let mut reader = open_source(input)?;
    let extra = reader.layout().extra_columns();
    if !extra.is_empty() {
        log_info(format!("Ignoring {} extra column(s):", extra.len()));
        for column in extra {
            log_info_indent(column, 1);
        }
    }

    let file = File::create(output).map_err(|source| PipelineError::Output {
        path: output.to_path_buf(),
        source,
    })?;
    let mut out = BufWriter::new(file);

    let source_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());
    write_banner(&mut out, &table, &source_name)?;

    let mut progress = ProgressReporter::new(precount);
    let (_, stats) = write_statements(
        &mut reader,
        out,
        &transformer,
        options.batch_size,
        &mut progress,
    )
    .map_err(|e| {
        log_error(format!(
            "Transform aborted; statements already flushed remain in {}",
            output.display()
        ));
        e
    })?;

    log_success(format!("Completed! Processed {} rows.", stats.rows));
    log_success(format!("Output written to: {}", output.display()));

    Ok(TransformStats {
        precount,
        rows: stats.rows,
        statements: stats.statements,
        table,
        output: output.to_path_buf(),
        batch_id: transformer.batch_id().to_string(),
    })
}
