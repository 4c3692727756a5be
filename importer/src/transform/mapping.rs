//! Destination table layout.
//!
//! A [`ColumnMapping`] names the target table and lists its columns in
//! INSERT order. Each column reads one [`SourceField`] through a
//! [`Normalizer`], holds a constant `value`, is computed by a [`Derivation`],
//! or is always `NULL`.
//!
//! Mappings can be loaded from JSON:
//!
//! ```json
//! {
//!   "table": "personal_contacts",
//!   "columns": [
//!     { "column": "external_id", "source": "Record ID" },
//!     { "column": "phone", "source": "Phone Number", "normalizer": "phone" },
//!     { "column": "source", "value": "dental_csv_import" },
//!     { "column": "tags", "derive": "tags" },
//!     { "column": "company" }
//!   ]
//! }
//! ```
//!
//! No live schema is consulted; [`ColumnMapping::audit`] only reports columns
//! that can never be filled and export fields that are never used.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use super::derive::Derivation;
use super::normalize::Normalizer;
use crate::error::{MappingError, MappingResult};
use crate::models::SourceField;

/// Table name used when no mapping file is given.
pub const DEFAULT_TABLE: &str = "personal_contacts";

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"));

/// One destination column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name in the destination table
    pub column: String,
    /// Export field feeding the column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceField>,
    /// Cleaning rule for the source value
    #[serde(default)]
    pub normalizer: Normalizer,
    /// Same text on every row
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Computed from the whole record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derive: Option<Derivation>,
}

impl ColumnSpec {
    pub fn new(column: &str, source: SourceField, normalizer: Normalizer) -> Self {
        Self {
            column: column.to_string(),
            source: Some(source),
            normalizer,
            value: None,
            derive: None,
        }
    }

    pub fn null(column: &str) -> Self {
        Self {
            column: column.to_string(),
            source: None,
            normalizer: Normalizer::Text,
            value: None,
            derive: None,
        }
    }

    pub fn constant(column: &str, value: &str) -> Self {
        Self {
            value: Some(value.to_string()),
            ..Self::null(column)
        }
    }

    pub fn derived(column: &str, derivation: Derivation) -> Self {
        Self {
            derive: Some(derivation),
            ..Self::null(column)
        }
    }

    /// Nothing ever fills this column.
    pub fn is_always_null(&self) -> bool {
        self.source.is_none() && self.value.is_none() && self.derive.is_none()
    }

    /// Export fields this column reads.
    pub fn reads(&self) -> Vec<SourceField> {
        let mut fields: Vec<SourceField> = self.source.into_iter().collect();
        if let Some(derivation) = self.derive {
            fields.extend_from_slice(derivation.sources());
        }
        fields
    }
}

/// Target table and ordered column list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub table: String,
    pub columns: Vec<ColumnSpec>,
}

/// Findings from [`ColumnMapping::audit`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingAudit {
    /// Columns with no source field
    pub always_null: Vec<String>,
    /// Export fields no column reads
    pub unused_fields: Vec<SourceField>,
}

impl Default for ColumnMapping {
    /// The `personal_contacts` layout: 16 columns, `company` and `country` unfilled.
    fn default() -> Self {
        use Normalizer::*;
        use SourceField::*;

        Self {
            table: DEFAULT_TABLE.to_string(),
            columns: vec![
                ColumnSpec::new("external_id", RecordId, Text),
                ColumnSpec::new("first_name", FirstName, Text),
                ColumnSpec::new("last_name", LastName, Text),
                ColumnSpec::new("email", Email, Text),
                ColumnSpec::new("phone", PhoneNumber, Phone),
                ColumnSpec::new("mobile_phone", MobilePhoneNumber, Phone),
                ColumnSpec::new("job_title", Specialty, Text),
                ColumnSpec::null("company"),
                ColumnSpec::new("city", City, Text),
                ColumnSpec::new("state", StateRegion, Text),
                ColumnSpec::null("country"),
                ColumnSpec::new("notes", Notes, Text),
                ColumnSpec::new("score", HubspotScore, Number),
                ColumnSpec::new("owner", ContactOwner, Text),
                ColumnSpec::new("created_at", CreateDate, Date),
                ColumnSpec::new("sales_activities_count", SalesActivities, Number),
            ],
        }
    }
}

impl ColumnMapping {
    /// Parse and check a mapping from JSON text.
    pub fn from_json(json: &str) -> MappingResult<Self> {
        let mapping: ColumnMapping = serde_json::from_str(json)?;
        mapping.validate()?;
        Ok(mapping)
    }

    /// Load a mapping file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> MappingResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| MappingError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> MappingResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Names are emitted unquoted, so they must be plain identifiers.
    pub fn validate(&self) -> MappingResult<()> {
        if self.columns.is_empty() {
            return Err(MappingError::Empty);
        }
        if !IDENTIFIER.is_match(&self.table) {
            return Err(MappingError::InvalidIdentifier(self.table.clone()));
        }

        let mut seen = HashSet::new();
        for spec in &self.columns {
            if !IDENTIFIER.is_match(&spec.column) {
                return Err(MappingError::InvalidIdentifier(spec.column.clone()));
            }
            if !seen.insert(spec.column.to_ascii_lowercase()) {
                return Err(MappingError::DuplicateColumn(spec.column.clone()));
            }
            let fillers = [
                spec.source.is_some(),
                spec.value.is_some(),
                spec.derive.is_some(),
            ];
            if fillers.iter().filter(|set| **set).count() > 1 {
                return Err(MappingError::ConflictingSources(spec.column.clone()));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Whether any column uses `derivation`.
    pub fn derives(&self, derivation: Derivation) -> bool {
        self.columns.iter().any(|c| c.derive == Some(derivation))
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.column.as_str()).collect()
    }

    /// `INSERT INTO <table> (<columns>) VALUES` without the trailing newline.
    pub fn insert_prefix(&self) -> String {
        format!(
            "INSERT INTO {} ({}) VALUES",
            self.table,
            self.column_names().join(", ")
        )
    }

    /// Columns that are always NULL and export fields nothing reads.
    pub fn audit(&self) -> MappingAudit {
        let always_null = self
            .columns
            .iter()
            .filter(|c| c.is_always_null())
            .map(|c| c.column.clone())
            .collect();

        let used: HashSet<SourceField> = self.columns.iter().flat_map(|c| c.reads()).collect();
        let unused_fields = SourceField::ALL
            .iter()
            .copied()
            .filter(|f| !used.contains(f))
            .collect();

        MappingAudit {
            always_null,
            unused_fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let mapping = ColumnMapping::default();
        assert_eq!(mapping.len(), 16);
        assert_eq!(mapping.table, "personal_contacts");
        assert_eq!(mapping.columns[7].column, "company");
        assert_eq!(mapping.columns[10].column, "country");
        assert!(mapping.validate().is_ok());
    }

    #[test]
    fn test_insert_prefix() {
        let prefix = ColumnMapping::default().insert_prefix();
        assert_eq!(
            prefix,
            "INSERT INTO personal_contacts (external_id, first_name, last_name, email, phone, mobile_phone, job_title, company, city, state, country, notes, score, owner, created_at, sales_activities_count) VALUES"
        );
    }

    #[test]
    fn test_default_audit() {
        let audit = ColumnMapping::default().audit();
        assert_eq!(audit.always_null, vec!["company", "country"]);
        assert!(audit.unused_fields.is_empty());
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "table": "leads",
            "columns": [
                { "column": "id", "source": "Record ID" },
                { "column": "mobile", "source": "Mobile Phone Number", "normalizer": "phone" },
                { "column": "region" }
            ]
        }"#;
        let mapping = ColumnMapping::from_json(json).unwrap();
        assert_eq!(mapping.table, "leads");
        assert_eq!(mapping.columns[1].normalizer, Normalizer::Phone);
        assert_eq!(mapping.columns[0].normalizer, Normalizer::Text);
        assert_eq!(mapping.columns[2].source, None);

        let audit = mapping.audit();
        assert_eq!(audit.always_null, vec!["region"]);
        assert_eq!(audit.unused_fields.len(), 12);
    }

    #[test]
    fn test_constant_and_derived_columns() {
        let json = r#"{
            "table": "personal_contacts",
            "columns": [
                { "column": "email", "source": "Email" },
                { "column": "source", "value": "dental_csv_import" },
                { "column": "import_batch_id", "derive": "import_batch" },
                { "column": "tags", "derive": "tags" }
            ]
        }"#;
        let mapping = ColumnMapping::from_json(json).unwrap();
        assert_eq!(mapping.columns[1], ColumnSpec::constant("source", "dental_csv_import"));
        assert_eq!(
            mapping.columns[3],
            ColumnSpec::derived("tags", Derivation::Tags)
        );
        assert!(mapping.derives(Derivation::ImportBatch));
        assert!(!ColumnMapping::default().derives(Derivation::Tags));

        let audit = mapping.audit();
        assert!(audit.always_null.is_empty());
        // Email plus the three fields tags read
        assert_eq!(audit.unused_fields.len(), 10);
        assert!(!audit.unused_fields.contains(&SourceField::HubspotScore));
    }

    #[test]
    fn test_rejects_column_with_two_fillers() {
        let json = r#"{ "table": "t", "columns": [
            { "column": "a", "source": "Email", "value": "x" }
        ] }"#;
        assert!(matches!(
            ColumnMapping::from_json(json),
            Err(MappingError::ConflictingSources(c)) if c == "a"
        ));
    }

    #[test]
    fn test_json_roundtrip_of_default() {
        let mapping = ColumnMapping::default();
        let json = mapping.to_json().unwrap();
        assert_eq!(ColumnMapping::from_json(&json).unwrap(), mapping);
    }

    #[test]
    fn test_rejects_unknown_source_field() {
        let json = r#"{ "table": "t", "columns": [ { "column": "x", "source": "Fax" } ] }"#;
        assert!(matches!(
            ColumnMapping::from_json(json),
            Err(MappingError::Json(_))
        ));
    }

    #[test]
    fn test_rejects_duplicates_and_bad_names() {
        let dup = r#"{ "table": "t", "columns": [ { "column": "a" }, { "column": "A" } ] }"#;
        assert!(matches!(
            ColumnMapping::from_json(dup),
            Err(MappingError::DuplicateColumn(_))
        ));

        let bad = r#"{ "table": "t; DROP TABLE x", "columns": [ { "column": "a" } ] }"#;
        assert!(matches!(
            ColumnMapping::from_json(bad),
            Err(MappingError::InvalidIdentifier(_))
        ));

        let empty = r#"{ "table": "t", "columns": [] }"#;
        assert!(matches!(
            ColumnMapping::from_json(empty),
            Err(MappingError::Empty)
        ));
    }
}
