//! Columns computed from a whole record or from the run itself.
//!
//! - `tags`: the specialty, plus `High Score` and `Active` markers, as a
//!   `text[]` literal
//! - `import_batch`: the identifier shared by every row of one run

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::normalize::clean_text;
use crate::models::{RawRecord, SourceField, SqlLiteral};

/// Tag added when the HubSpot score is above this.
pub const HIGH_SCORE_THRESHOLD: f64 = 150.0;

/// Tag added when the sales activity count is above this.
pub const ACTIVE_THRESHOLD: f64 = 10.0;

pub const HIGH_SCORE_TAG: &str = "High Score";
pub const ACTIVE_TAG: &str = "Active";

static LEADING_INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?[0-9]+)").expect("valid regex"));

/// A column value that no single export field provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Derivation {
    Tags,
    ImportBatch,
}

impl Derivation {
    /// Export fields read by this derivation.
    pub fn sources(&self) -> &'static [SourceField] {
        match self {
            Derivation::Tags => &[
                SourceField::Specialty,
                SourceField::HubspotScore,
                SourceField::SalesActivities,
            ],
            Derivation::ImportBatch => &[],
        }
    }

    pub fn apply(&self, record: &RawRecord, batch_id: &str) -> SqlLiteral {
        match self {
            Derivation::Tags => tags_literal(&derive_tags(record)),
            Derivation::ImportBatch => clean_text(batch_id)
                .map(SqlLiteral::Quoted)
                .unwrap_or(SqlLiteral::Null),
        }
    }
}

/// Integer prefix of a cell (`"155.0"` -> 155, `"12 calls"` -> 12).
pub fn leading_integer(s: &str) -> Option<f64> {
    LEADING_INTEGER
        .captures(s)
        .and_then(|caps| caps[1].parse().ok())
}

/// Tags for one contact, in a fixed order: specialty, high score, active.
pub fn derive_tags(record: &RawRecord) -> Vec<String> {
    let mut tags = Vec::new();

    let specialty = record.specialty.trim();
    if !specialty.is_empty() {
        tags.push(specialty.to_string());
    }
    if leading_integer(&record.hubspot_score).is_some_and(|n| n > HIGH_SCORE_THRESHOLD) {
        tags.push(HIGH_SCORE_TAG.to_string());
    }
    if leading_integer(&record.sales_activities).is_some_and(|n| n > ACTIVE_THRESHOLD) {
        tags.push(ACTIVE_TAG.to_string());
    }
    tags
}

/// `ARRAY['a','b']`, or a typed empty array.
pub fn tags_literal(tags: &[String]) -> SqlLiteral {
    if tags.is_empty() {
        return SqlLiteral::Bare("ARRAY[]::text[]".to_string());
    }
    let items: Vec<String> = tags
        .iter()
        .map(|t| format!("'{}'", t.replace('\'', "''")))
        .collect();
    SqlLiteral::Bare(format!("ARRAY[{}]", items.join(",")))
}

/// `contact_import_<unix millis>`.
pub fn new_batch_id() -> String {
    format!("contact_import_{}", Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(specialty: &str, score: &str, activities: &str) -> RawRecord {
        RawRecord {
            specialty: specialty.to_string(),
            hubspot_score: score.to_string(),
            sales_activities: activities.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_leading_integer() {
        assert_eq!(leading_integer("155.0"), Some(155.0));
        assert_eq!(leading_integer(" 12 calls"), Some(12.0));
        assert_eq!(leading_integer("-4"), Some(-4.0));
        assert_eq!(leading_integer("abc"), None);
        assert_eq!(leading_integer(""), None);
    }

    #[test]
    fn test_derive_tags() {
        assert_eq!(
            derive_tags(&record("Endodontist", "151", "11")),
            vec!["Endodontist", "High Score", "Active"]
        );
        assert_eq!(derive_tags(&record("Endodontist", "150", "10")), vec!["Endodontist"]);
        assert_eq!(derive_tags(&record("", "200.9", "")), vec!["High Score"]);
        assert!(derive_tags(&record("  ", "n/a", "x")).is_empty());
    }

    #[test]
    fn test_tags_literal() {
        let tags = vec!["Dr's Pick".to_string(), "Active".to_string()];
        assert_eq!(tags_literal(&tags).to_string(), "ARRAY['Dr''s Pick','Active']");
        assert_eq!(tags_literal(&[]).to_string(), "ARRAY[]::text[]");
    }

    #[test]
    fn test_import_batch_literal() {
        let raw = RawRecord::default();
        assert_eq!(
            Derivation::ImportBatch.apply(&raw, "run_1").to_string(),
            "'run_1'"
        );
        assert!(new_batch_id().starts_with("contact_import_"));
    }

    #[test]
    fn test_serde_names() {
        let d: Derivation = serde_json::from_str("\"import_batch\"").unwrap();
        assert_eq!(d, Derivation::ImportBatch);
        assert_eq!(serde_json::to_string(&Derivation::Tags).unwrap(), "\"tags\"");
    }
}
