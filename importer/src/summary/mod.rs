//! Summary pipeline.
//!
//! - `aggregator`: frequency tables and missing-data counters
//! - `report`: ranked report, text and JSON rendering
//!
//! The export is opened twice in sequence: once for the counting pass, once
//! more to pull the first few rows verbatim.

pub mod aggregator;
pub mod report;

pub use aggregator::{percent, Aggregator, FrequencyTable, RankedEntry};
pub use report::{
    group_thousands, SampleRecord, Share, SummaryReport, YearEntry, DEFAULT_SAMPLE_SIZE,
    DEFAULT_TOP_N,
};

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

use crate::error::{PipelineResult, SourceResult};
use crate::logs::{log_info, log_success};
use crate::parser::{open_source, ContactReader};

/// Options for the summary pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryOptions {
    /// Entries per ranked section
    pub top_n: usize,
    /// Raw rows shown at the end
    pub sample_size: usize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

/// Fold every remaining row of `reader` into a fresh [`Aggregator`].
pub fn aggregate<R: Read>(reader: &mut ContactReader<R>) -> SourceResult<Aggregator> {
    let mut aggregator = Aggregator::new();
    for record in reader.records() {
        aggregator.add(&record?);
    }
    Ok(aggregator)
}

/// First `n` rows of `reader`, unnormalized.
pub fn read_samples<R: Read>(reader: &mut ContactReader<R>, n: usize) -> SourceResult<Vec<SampleRecord>> {
    reader
        .records()
        .take(n)
        .map(|record| record.map(|r| SampleRecord::from(&r)))
        .collect()
}

/// Count pass plus sample pass over an export file.
pub fn run_summary(input: &Path, options: &SummaryOptions) -> PipelineResult<SummaryReport> {
    log_info(format!("Analyzing CSV file: {}", input.display()));

    let aggregator = {
        let mut reader = open_source(input)?;
        aggregate(&mut reader)?
    };
    log_success(format!("Aggregated {} records", aggregator.total));

    let samples = {
        let mut reader = open_source(input)?;
        read_samples(&mut reader, options.sample_size)?
    };

    Ok(SummaryReport::build(&aggregator, options, samples))
}
