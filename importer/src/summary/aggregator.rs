//! Streaming aggregation over the contact export.
//!
//! All state lives in an [`Aggregator`] value, so several datasets can be
//! summarized side by side in one process.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::models::RawRecord;
use crate::transform::normalize::creation_year;

/// Occurrence counts per categorical value, remembering first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `key`.
    pub fn increment(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    pub fn get(&self, key: &str) -> u64 {
        self.index.get(key).map(|&i| self.entries[i].1).unwrap_or(0)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    /// The `n` most frequent keys; equal counts keep first-seen order.
    pub fn most_common(&self, n: usize) -> Vec<(&str, u64)> {
        // entries are already in first-seen order and sort_by_key is stable
        let mut ranked: Vec<(&str, u64)> =
            self.entries.iter().map(|(k, c)| (k.as_str(), *c)).collect();
        ranked.sort_by_key(|&(_, count)| std::cmp::Reverse(count));
        ranked.truncate(n);
        ranked
    }
}

/// Counters accumulated over one pass.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    pub total: u64,
    pub missing_email: u64,
    pub missing_phone: u64,
    pub specialties: FrequencyTable,
    pub states: FrequencyTable,
    pub owners: FrequencyTable,
    pub years: BTreeMap<i32, u64>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one raw row into the counters.
    ///
    /// Categorical keys are the raw cell text: " NY" and "NY" are different keys.
    pub fn add(&mut self, record: &RawRecord) {
        self.total += 1;

        if !record.specialty.is_empty() {
            self.specialties.increment(&record.specialty);
        }
        if !record.state_region.is_empty() {
            self.states.increment(&record.state_region);
        }
        if !record.contact_owner.is_empty() {
            self.owners.increment(&record.contact_owner);
        }
        if let Some(year) = creation_year(&record.create_date) {
            *self.years.entry(year).or_insert(0) += 1;
        }

        if record.email.trim().is_empty() {
            self.missing_email += 1;
        }
        if record.phone_number.trim().is_empty() {
            self.missing_phone += 1;
        }
    }

    /// Fold every record from an iterator.
    pub fn extend<'a, I>(&mut self, records: I)
    where
        I: IntoIterator<Item = &'a RawRecord>,
    {
        for record in records {
            self.add(record);
        }
    }
}

/// Percent of `total`, or 0.0 without dividing when `total` is zero.
pub fn percent(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

/// One ranked value with its share of all records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub value: String,
    pub count: u64,
    pub percent: f64,
}

impl RankedEntry {
    pub fn new(value: impl Into<String>, count: u64, total: u64) -> Self {
        Self {
            value: value.into(),
            count,
            percent: percent(count, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(specialty: &str, state: &str, owner: &str, email: &str, phone: &str, created: &str) -> RawRecord {
        RawRecord {
            specialty: specialty.into(),
            state_region: state.into(),
            contact_owner: owner.into(),
            email: email.into(),
            phone_number: phone.into(),
            create_date: created.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_frequency_table() {
        let mut table = FrequencyTable::new();
        for key in ["a", "b", "a", "c", "b", "a"] {
            table.increment(key);
        }
        assert_eq!(table.get("a"), 3);
        assert_eq!(table.get("z"), 0);
        assert_eq!(table.len(), 3);
        assert_eq!(table.total(), 6);
        assert_eq!(table.most_common(2), vec![("a", 3), ("b", 2)]);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let mut table = FrequencyTable::new();
        for key in ["delta", "alpha", "charlie", "bravo", "alpha", "bravo"] {
            table.increment(key);
        }
        assert_eq!(
            table.most_common(10),
            vec![("alpha", 2), ("bravo", 2), ("delta", 1), ("charlie", 1)]
        );
    }

    #[test]
    fn test_top_ten_truncates() {
        let mut table = FrequencyTable::new();
        for i in 0..15 {
            for _ in 0..(i % 4 + 1) {
                table.increment(&format!("k{}", i));
            }
        }
        let top = table.most_common(10);
        assert_eq!(top.len(), 10);
        // count 4: k3, k7, k11; count 3: k2, k6, k10, k14; count 2: k1, k5, k9
        let keys: Vec<&str> = top.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            vec!["k3", "k7", "k11", "k2", "k6", "k10", "k14", "k1", "k5", "k9"]
        );
    }

    #[test]
    fn test_aggregate_counts() {
        let rows = vec![
            contact("Endo", "NY", "Ann", "a@x.com", "555", "2021-05-01 10:00:00"),
            contact("Ortho", "NJ", "Bob", "", "", "2022-01-01 00:00:00"),
            contact("Endo", "NY", "", "  ", "555", "not a date"),
            contact("", "", "Ann", "c@x.com", " ", ""),
            contact("endo", "NY ", "Ann", "d@x.com", "555", "2021-12-31 23:59:59"),
        ];

        let mut agg = Aggregator::new();
        agg.extend(&rows);

        assert_eq!(agg.total, 5);
        assert_eq!(agg.missing_email, 2);
        assert_eq!(agg.missing_phone, 2);
        assert_eq!(agg.specialties.most_common(10), vec![("Endo", 2), ("Ortho", 1), ("endo", 1)]);
        assert_eq!(agg.states.most_common(10), vec![("NY", 2), ("NJ", 1), ("NY ", 1)]);
        assert_eq!(agg.owners.most_common(10), vec![("Ann", 3), ("Bob", 1)]);
        assert_eq!(agg.years.iter().collect::<Vec<_>>(), vec![(&2021, &2), (&2022, &1)]);
    }

    #[test]
    fn test_whitespace_category_is_counted_raw() {
        let mut agg = Aggregator::new();
        agg.add(&contact(" ", "", "", "x", "1", ""));
        assert_eq!(agg.specialties.get(" "), 1);
        assert!(agg.states.is_empty());
    }

    #[test]
    fn test_percent_guard() {
        assert_eq!(percent(0, 0), 0.0);
        assert_eq!(percent(1, 4), 25.0);
        let entry = RankedEntry::new("NY", 3, 0);
        assert_eq!(entry.percent, 0.0);
    }

    #[test]
    fn test_separate_aggregators_are_independent() {
        let mut a = Aggregator::new();
        let mut b = Aggregator::new();
        a.add(&contact("Endo", "NY", "Ann", "", "", ""));
        assert_eq!(a.total, 1);
        assert_eq!(b.total, 0);
        b.add(&contact("Ortho", "NJ", "Bob", "", "", ""));
        assert_eq!(a.specialties.get("Ortho"), 0);
    }
}
