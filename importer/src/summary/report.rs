//! Summary report: ranked counts, missing-data rates, sample rows.
//!
//! The text rendering is meant for people; JSON is available through serde
//! for anything that needs to parse the numbers.

use serde::Serialize;
use std::fmt;

use super::aggregator::{percent, Aggregator, FrequencyTable, RankedEntry};
use super::SummaryOptions;
use crate::models::RawRecord;

/// Ranked entries per section when nothing else is configured.
pub const DEFAULT_TOP_N: usize = 10;

/// Sample rows when nothing else is configured.
pub const DEFAULT_SAMPLE_SIZE: usize = 5;

/// A count with its share of all records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Share {
    pub count: u64,
    pub percent: f64,
}

impl Share {
    pub fn new(count: u64, total: u64) -> Self {
        Self {
            count,
            percent: percent(count, total),
        }
    }
}

/// Records created in one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearEntry {
    pub year: i32,
    pub count: u64,
    pub percent: f64,
}

/// One export row shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleRecord {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub specialty: String,
    pub city: String,
    pub state: String,
    pub score: String,
}

impl From<&RawRecord> for SampleRecord {
    fn from(record: &RawRecord) -> Self {
        Self {
            id: record.record_id.clone(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            email: record.email.clone(),
            specialty: record.specialty.clone(),
            city: record.city.clone(),
            state: record.state_region.clone(),
            score: record.hubspot_score.clone(),
        }
    }
}

/// Everything the summary shows, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub total: u64,
    pub missing_email: Share,
    pub missing_phone: Share,
    pub top_n: usize,
    pub sample_size: usize,
    pub specialties: Vec<RankedEntry>,
    pub states: Vec<RankedEntry>,
    pub owners: Vec<RankedEntry>,
    pub years: Vec<YearEntry>,
    pub samples: Vec<SampleRecord>,
}

impl SummaryReport {
    /// Freeze the counters into a report.
    pub fn build(aggregator: &Aggregator, options: &SummaryOptions, samples: Vec<SampleRecord>) -> Self {
        let total = aggregator.total;
        let top_n = options.top_n;
        let ranked = |table: &FrequencyTable| -> Vec<RankedEntry> {
            table
                .most_common(top_n)
                .into_iter()
                .map(|(value, count)| RankedEntry::new(value, count, total))
                .collect()
        };

        Self {
            total,
            missing_email: Share::new(aggregator.missing_email, total),
            missing_phone: Share::new(aggregator.missing_phone, total),
            top_n,
            sample_size: options.sample_size,
            specialties: ranked(&aggregator.specialties),
            states: ranked(&aggregator.states),
            owners: ranked(&aggregator.owners),
            years: aggregator
                .years
                .iter()
                .map(|(&year, &count)| YearEntry {
                    year,
                    count,
                    percent: percent(count, total),
                })
                .collect(),
            samples,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn write_ranked(f: &mut fmt::Formatter<'_>, title: &str, entries: &[RankedEntry]) -> fmt::Result {
    writeln!(f, "\n=== {} ===", title)?;
    for entry in entries {
        writeln!(
            f,
            "{}: {} ({:.1}%)",
            entry.value,
            group_thousands(entry.count),
            entry.percent
        )?;
    }
    Ok(())
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n=== CSV DATA SUMMARY ===")?;
        writeln!(f, "Total Records: {}", group_thousands(self.total))?;
        writeln!(
            f,
            "Records with missing emails: {} ({:.1}%)",
            group_thousands(self.missing_email.count),
            self.missing_email.percent
        )?;
        writeln!(
            f,
            "Records with missing phones: {} ({:.1}%)",
            group_thousands(self.missing_phone.count),
            self.missing_phone.percent
        )?;

        write_ranked(f, &format!("TOP {} SPECIALTIES", self.top_n), &self.specialties)?;
        write_ranked(f, &format!("TOP {} STATES", self.top_n), &self.states)?;
        write_ranked(f, &format!("TOP {} CONTACT OWNERS", self.top_n), &self.owners)?;

        writeln!(f, "\n=== RECORDS BY YEAR ===")?;
        for entry in &self.years {
            writeln!(
                f,
                "{}: {} ({:.1}%)",
                entry.year,
                group_thousands(entry.count),
                entry.percent
            )?;
        }

        writeln!(f, "\n=== SAMPLE RECORDS (First {}) ===", self.sample_size)?;
        for (i, sample) in self.samples.iter().enumerate() {
            writeln!(f, "\nRecord {}:", i + 1)?;
            writeln!(f, "  ID: {}", sample.id)?;
            writeln!(f, "  Name: {} {}", sample.first_name, sample.last_name)?;
            writeln!(f, "  Email: {}", sample.email)?;
            writeln!(f, "  Specialty: {}", sample.specialty)?;
            writeln!(f, "  Location: {}, {}", sample.city, sample.state)?;
            writeln!(f, "  Score: {}", sample.score)?;
        }
        Ok(())
    }
}
