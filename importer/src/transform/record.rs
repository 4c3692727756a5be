//! Raw record to destination row.

use super::derive::new_batch_id;
use super::mapping::{ColumnMapping, ColumnSpec};
use super::normalize::clean_text;
use crate::models::{DestinationRow, RawRecord, SqlLiteral};

/// Maps export rows onto a [`ColumnMapping`]. Never rejects a row.
#[derive(Debug, Clone)]
pub struct RecordTransformer {
    mapping: ColumnMapping,
    batch_id: String,
}

impl RecordTransformer {
    /// Uses a fresh import batch identifier.
    pub fn new(mapping: ColumnMapping) -> Self {
        Self {
            mapping,
            batch_id: new_batch_id(),
        }
    }

    pub fn with_batch_id(mut self, batch_id: impl Into<String>) -> Self {
        self.batch_id = batch_id.into();
        self
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    pub fn batch_id(&self) -> &str {
        &self.batch_id
    }

    fn literal(&self, spec: &ColumnSpec, record: &RawRecord) -> SqlLiteral {
        if let Some(field) = spec.source {
            return SqlLiteral::from(spec.normalizer.apply(record.get(field)));
        }
        if let Some(ref value) = spec.value {
            return clean_text(value)
                .map(SqlLiteral::Quoted)
                .unwrap_or(SqlLiteral::Null);
        }
        match spec.derive {
            Some(derivation) => derivation.apply(record, &self.batch_id),
            None => SqlLiteral::Null,
        }
    }

    /// One literal per mapped column, in column order.
    pub fn transform(&self, record: &RawRecord) -> DestinationRow {
        let values = self
            .mapping
            .columns
            .iter()
            .map(|spec| self.literal(spec, record))
            .collect();
        DestinationRow::new(values)
    }
}

impl Default for RecordTransformer {
    fn default() -> Self {
        Self::new(ColumnMapping::default())
    }
}
