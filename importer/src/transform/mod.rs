//! Transform pipeline.
//!
//! - `normalize`: field cleaning rules
//! - `derive`: tags and import batch stamps
//! - `mapping`: destination table and column layout
//! - `record`: raw record to destination row
//! - `batch`: multi-row INSERT statements
//! - `progress`: row-count progress on the diagnostic stream
//! - `pipeline`: file-to-file orchestration

pub mod batch;
pub mod derive;
pub mod mapping;
pub mod normalize;
pub mod pipeline;
pub mod progress;
pub mod record;

pub use batch::{BatchEmitter, EmitStats, Flush, DEFAULT_BATCH_SIZE};
pub use derive::{derive_tags, new_batch_id, Derivation};
pub use mapping::{ColumnMapping, ColumnSpec, MappingAudit, DEFAULT_TABLE};
pub use normalize::{clean_number, clean_phone, clean_text, creation_year, parse_date, Normalizer};
pub use pipeline::*;
pub use progress::{ProgressReporter, ProgressUpdate};
pub use record::RecordTransformer;
