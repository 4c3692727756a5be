//! Row-count progress for the transform pipeline.

use std::fmt;

use crate::logs::log_info;

/// Progress snapshot taken after a batch flush.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdate {
    pub processed: usize,
    pub total: usize,
}

impl ProgressUpdate {
    /// Percent of the precounted total; 0.0 when the total is zero.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.processed as f64 / self.total as f64 * 100.0
    }
}

impl fmt::Display for ProgressUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed {}/{} rows ({:.1}%)",
            self.processed,
            self.total,
            self.percent()
        )
    }
}

/// Logs a [`ProgressUpdate`] for each flush.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    total: usize,
    reports: usize,
}

impl ProgressReporter {
    /// `total` is the data-row precount.
    pub fn new(total: usize) -> Self {
        Self { total, reports: 0 }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of updates emitted so far.
    pub fn reports(&self) -> usize {
        self.reports
    }

    pub fn report(&mut self, processed: usize) -> ProgressUpdate {
        let update = ProgressUpdate {
            processed,
            total: self.total,
        };
        self.reports += 1;
        log_info(update.to_string());
        update
    }
}
