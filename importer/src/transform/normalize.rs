//! Field normalizers.
//!
//! Every function here is total: blank or malformed input becomes `None`
//! (rendered as `NULL`) so one bad cell never stops a run.

use chrono::{Datelike, NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::NormalizedValue;

/// Canonical timestamp pattern, used for both parsing and rendering.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static NON_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9]").expect("valid regex"));

// chrono alone accepts signed and short years
static TIMESTAMP_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{1,2}-[0-9]{1,2} [0-9]{1,2}:[0-9]{1,2}:[0-9]{1,2}$")
        .expect("valid regex")
});

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Trim and escape single quotes for a SQL string literal.
pub fn clean_text(s: &str) -> Option<String> {
    if is_blank(s) {
        return None;
    }
    Some(s.trim().replace('\'', "''"))
}

/// Keep ASCII digits only.
pub fn clean_phone(s: &str) -> Option<String> {
    if is_blank(s) {
        return None;
    }
    let digits = NON_DIGIT.replace_all(s.trim(), "");
    if digits.is_empty() {
        None
    } else {
        Some(digits.into_owned())
    }
}

/// Drop digit-group underscores (`1_000`); `None` if one is misplaced.
fn strip_digit_groups(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'_' {
            let before = i > 0 && bytes[i - 1].is_ascii_digit();
            let after = bytes.get(i + 1).is_some_and(|c| c.is_ascii_digit());
            if !(before && after) {
                return None;
            }
        }
    }
    Some(s.replace('_', ""))
}

/// Parse a number; integral values lose their fractional part (`5.0` -> `5`).
pub fn clean_number(s: &str) -> Option<String> {
    if is_blank(s) {
        return None;
    }
    let text = strip_digit_groups(s.trim())?;
    let value: f64 = text.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    if value == 0.0 {
        // also folds -0.0
        return Some("0".to_string());
    }
    if value.fract() == 0.0 {
        // exact integer digits, even past 2^53
        return Some(format!("{:.0}", value));
    }
    // shortest round-trip digits, never exponent notation
    Some(value.to_string())
}

/// Parse a `YYYY-MM-DD HH:MM:SS` timestamp.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    if is_blank(s) {
        return None;
    }
    let text = s.trim();
    if !TIMESTAMP_SHAPE.is_match(text) {
        return None;
    }
    let dt = NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT).ok()?;
    // leap second
    if dt.nanosecond() >= 1_000_000_000 {
        return None;
    }
    Some(dt)
}

/// Re-render a timestamp in the canonical pattern.
pub fn parse_date(s: &str) -> Option<String> {
    parse_timestamp(s).map(|dt| dt.format(TIMESTAMP_FORMAT).to_string())
}

/// Calendar year of a creation timestamp.
pub fn creation_year(s: &str) -> Option<i32> {
    parse_timestamp(s).map(|dt| dt.year())
}

/// Which cleaning rule a destination column applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalizer {
    #[default]
    Text,
    Phone,
    Number,
    Date,
}

impl Normalizer {
    pub fn apply(&self, raw: &str) -> Option<NormalizedValue> {
        match self {
            Normalizer::Text => clean_text(raw).map(NormalizedValue::Text),
            Normalizer::Phone => clean_phone(raw).map(NormalizedValue::Digits),
            Normalizer::Number => clean_number(raw).map(NormalizedValue::Number),
            Normalizer::Date => parse_date(raw).map(NormalizedValue::Timestamp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  Ann  "), Some("Ann".to_string()));
        assert_eq!(clean_text(""), None);
        assert_eq!(clean_text(" \t "), None);
    }

    #[test]
    fn test_clean_text_doubles_quotes() {
        for input in ["O'Brien", "'quoted'", "trailing'", "a''b", " ' "] {
            let out = clean_text(input).unwrap();
            let quotes_in = input.trim().matches('\'').count();
            assert_eq!(out.matches('\'').count(), quotes_in * 2, "input {:?}", input);
            assert_eq!(out.matches("''").count(), quotes_in, "input {:?}", input);
            let trailing = out.len() - out.trim_end_matches('\'').len();
            assert_eq!(trailing % 2, 0, "unescaped quote at end of {:?}", out);
        }
        assert_eq!(clean_text("O'Brien"), Some("O''Brien".to_string()));
    }

    #[test]
    fn test_clean_phone() {
        assert_eq!(clean_phone("+1 (555) 010-1234"), Some("15550101234".to_string()));
        assert_eq!(clean_phone(""), None);
        assert_eq!(clean_phone("n/a"), None);
        assert_eq!(clean_phone("ext. 12"), Some("12".to_string()));
    }

    #[test]
    fn test_clean_phone_ascii_only() {
        // Arabic-Indic digits are not ASCII digits
        assert_eq!(clean_phone("٥٥٥"), None);
    }

    #[test]
    fn test_clean_number() {
        assert_eq!(clean_number("5.0"), Some("5".to_string()));
        assert_eq!(clean_number("5.25"), Some("5.25".to_string()));
        assert_eq!(clean_number("abc"), None);
        assert_eq!(clean_number(" 42 "), Some("42".to_string()));
        assert_eq!(clean_number("-3"), Some("-3".to_string()));
        assert_eq!(clean_number("-0.0"), Some("0".to_string()));
        assert_eq!(clean_number("1e3"), Some("1000".to_string()));
        assert_eq!(clean_number("0.1"), Some("0.1".to_string()));
        assert_eq!(clean_number(""), None);
    }

    #[test]
    fn test_clean_number_large_integers_exact() {
        assert_eq!(
            clean_number("1e23"),
            Some("99999999999999991611392".to_string())
        );
        assert_eq!(
            clean_number("9007199254740993"),
            Some("9007199254740992".to_string())
        );
    }

    #[test]
    fn test_clean_number_digit_groups() {
        assert_eq!(clean_number("1_000"), Some("1000".to_string()));
        assert_eq!(clean_number("1_000.5"), Some("1000.5".to_string()));
        assert_eq!(clean_number("_1000"), None);
        assert_eq!(clean_number("1__000"), None);
        assert_eq!(clean_number("1000_"), None);
    }

    #[test]
    fn test_clean_number_rejects_non_finite() {
        assert_eq!(clean_number("nan"), None);
        assert_eq!(clean_number("inf"), None);
        assert_eq!(clean_number("-infinity"), None);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2022-04-22 16:15:00"),
            Some("2022-04-22 16:15:00".to_string())
        );
        assert_eq!(
            parse_date(" 2022-04-22 16:15:00 "),
            Some("2022-04-22 16:15:00".to_string())
        );
        assert_eq!(parse_date("04/22/2022"), None);
        assert_eq!(parse_date("2022-04-22"), None);
        assert_eq!(parse_date("2022-13-01 00:00:00"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_parse_date_rejects_loose_shapes() {
        assert_eq!(parse_date("22-04-22 16:15:00"), None);
        assert_eq!(parse_date("+2022-04-22 16:15:00"), None);
        assert_eq!(parse_date("-2022-04-22 16:15:00"), None);
        assert_eq!(parse_date("12022-04-22 16:15:00"), None);
        assert_eq!(parse_date("2022-01-01 23:59:60"), None);
        assert_eq!(parse_date("2022-04-22T16:15:00"), None);
    }

    #[test]
    fn test_parse_date_idempotent() {
        let once = parse_date("2021-01-05 09:03:07").unwrap();
        assert_eq!(parse_date(&once), Some(once.clone()));
    }

    #[test]
    fn test_creation_year() {
        assert_eq!(creation_year("2019-12-31 23:59:59"), Some(2019));
        assert_eq!(creation_year("12/31/2019"), None);
        assert_eq!(creation_year("22-04-22 16:15:00"), None);
        assert_eq!(creation_year("+2022-04-22 16:15:00"), None);
        assert_eq!(creation_year("2016-12-31 23:59:60"), None);
    }

    #[test]
    fn test_normalizer_apply() {
        assert_eq!(
            Normalizer::Number.apply("7.0"),
            Some(NormalizedValue::Number("7".into()))
        );
        assert_eq!(
            Normalizer::Phone.apply("555-1234"),
            Some(NormalizedValue::Digits("5551234".into()))
        );
        assert_eq!(Normalizer::Date.apply("bad"), None);
        assert_eq!(Normalizer::Text.apply("   "), None);
    }
}
