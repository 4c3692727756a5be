//! Contact export reader.
//!
//! Wraps the `csv` crate: RFC 4180 quoting, blank lines skipped, a leading
//! UTF-8 byte-order mark stripped from the header. Header positions are
//! resolved once into a [`HeaderLayout`] and every row is read straight into a
//! fixed-layout [`RawRecord`].

use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{SourceError, SourceResult};
use crate::models::{RawRecord, SourceField};

const BOM: char = '\u{feff}';

/// Column position of each [`SourceField`] in one particular file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLayout {
    positions: [usize; 14],
    headers: Vec<String>,
}

impl HeaderLayout {
    /// Locate every expected field in a header row.
    ///
    /// Extra columns are ignored. When a name appears twice the last one wins,
    /// like a dict built from the row would.
    pub fn resolve(header: &StringRecord) -> SourceResult<Self> {
        if header.is_empty() {
            return Err(SourceError::NoHeaders);
        }

        let headers: Vec<String> = header
            .iter()
            .enumerate()
            .map(|(i, h)| {
                if i == 0 {
                    h.trim_start_matches(BOM).to_string()
                } else {
                    h.to_string()
                }
            })
            .collect();

        let mut positions = [0usize; 14];
        let mut missing = Vec::new();

        for field in SourceField::ALL {
            match headers.iter().rposition(|h| h == field.header()) {
                Some(pos) => positions[field.index()] = pos,
                None => missing.push(field.header().to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(SourceError::SchemaMismatch { missing });
        }

        Ok(Self { positions, headers })
    }

    /// Header names as read (BOM removed).
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Header columns that no [`SourceField`] uses.
    pub fn extra_columns(&self) -> Vec<&str> {
        self.headers
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.positions.contains(i))
            .map(|(_, h)| h.as_str())
            .collect()
    }

    /// Build a record from a data row. Cells past the end of a short row read as "".
    pub fn record(&self, row: &StringRecord) -> RawRecord {
        let values: [String; 14] =
            std::array::from_fn(|i| row.get(self.positions[i]).unwrap_or("").to_string());
        RawRecord::from_values(values)
    }
}

/// Streaming reader over a contact export.
pub struct ContactReader<R: Read> {
    inner: csv::Reader<R>,
    layout: HeaderLayout,
    row: StringRecord,
}

impl<R: Read> ContactReader<R> {
    /// Read and check the header row.
    pub fn new(reader: R) -> SourceResult<Self> {
        let mut inner = csv_reader(reader);
        let header = inner.headers()?.clone();
        let layout = HeaderLayout::resolve(&header)?;

        Ok(Self {
            inner,
            layout,
            row: StringRecord::new(),
        })
    }

    pub fn layout(&self) -> &HeaderLayout {
        &self.layout
    }

    /// Next data row, or `None` at end of input.
    pub fn read_record(&mut self) -> SourceResult<Option<RawRecord>> {
        if !self.inner.read_record(&mut self.row)? {
            return Ok(None);
        }
        Ok(Some(self.layout.record(&self.row)))
    }

    /// Iterate over the remaining rows.
    pub fn records(&mut self) -> Records<'_, R> {
        Records { reader: self }
    }
}

/// Iterator returned by [`ContactReader::records`].
pub struct Records<'a, R: Read> {
    reader: &'a mut ContactReader<R>,
}

impl<R: Read> Iterator for Records<'_, R> {
    type Item = SourceResult<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_record().transpose()
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader)
}

/// Open an export file and read its header.
pub fn open_source<P: AsRef<Path>>(path: P) -> SourceResult<ContactReader<File>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| SourceError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    ContactReader::new(file)
}

/// Count data rows (header excluded) without interpreting them.
pub fn count_records<R: Read>(reader: R) -> SourceResult<usize> {
    let mut inner = csv_reader(reader);
    let mut row = csv::ByteRecord::new();
    let mut count = 0;
    while inner.read_byte_record(&mut row)? {
        count += 1;
    }
    Ok(count)
}

/// Count data rows in an export file.
pub fn count_rows<P: AsRef<Path>>(path: P) -> SourceResult<usize> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| SourceError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    count_records(file)
}
