//! Multi-row INSERT batching.
//!
//! Rows accumulate until the batch is full, then the whole batch is written as
//! one statement:
//!
//! ```text
//! INSERT INTO personal_contacts (external_id, ...) VALUES
//! ('1',...),
//! ('2',...);
//!
//! ```
//!
//! [`BatchEmitter::finish`] flushes whatever is left. Rows are never reordered.

use std::io::Write;

use crate::models::DestinationRow;

/// Rows per INSERT statement when nothing else is configured.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Result of one flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flush {
    /// Rows in the statement just written
    pub rows: usize,
    /// Rows written so far, this statement included
    pub total_rows: usize,
}

/// Totals after [`BatchEmitter::finish`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitStats {
    pub rows: usize,
    pub statements: usize,
}

/// Accumulates destination rows and writes them as INSERT statements.
pub struct BatchEmitter<W: Write> {
    out: W,
    prefix: String,
    batch_size: usize,
    pending: Vec<DestinationRow>,
    stats: EmitStats,
}

impl<W: Write> BatchEmitter<W> {
    /// `prefix` is the `INSERT INTO ... VALUES` head; `batch_size` must be non-zero.
    pub fn new(out: W, prefix: impl Into<String>, batch_size: usize) -> Self {
        Self {
            out,
            prefix: prefix.into(),
            batch_size: batch_size.max(1),
            pending: Vec::with_capacity(batch_size.clamp(1, DEFAULT_BATCH_SIZE)),
            stats: EmitStats::default(),
        }
    }

    /// Add a row; writes a statement when the batch fills up.
    pub fn push(&mut self, row: DestinationRow) -> std::io::Result<Option<Flush>> {
        self.pending.push(row);
        if self.pending.len() >= self.batch_size {
            return self.flush().map(Some);
        }
        Ok(None)
    }

    /// Rows waiting for the next flush.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn stats(&self) -> EmitStats {
        self.stats
    }

    fn flush(&mut self) -> std::io::Result<Flush> {
        writeln!(self.out, "{}", self.prefix)?;
        for (i, row) in self.pending.iter().enumerate() {
            if i > 0 {
                self.out.write_all(b",\n")?;
            }
            write!(self.out, "{}", row)?;
        }
        self.out.write_all(b";\n\n")?;

        let rows = self.pending.len();
        self.pending.clear();
        self.stats.rows += rows;
        self.stats.statements += 1;

        Ok(Flush {
            rows,
            total_rows: self.stats.rows,
        })
    }

    /// Flush the last partial batch, flush the writer and hand it back.
    pub fn finish(mut self) -> std::io::Result<(W, EmitStats, Option<Flush>)> {
        let last = if self.pending.is_empty() {
            None
        } else {
            Some(self.flush()?)
        };
        self.out.flush()?;
        Ok((self.out, self.stats, last))
    }
}
