//! Immutable record index built once at startup

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::debug;

use super::{DatasetError, RawRecord, Record, ServiceWindow};
use crate::domain::request::DateQuery;

/// Counters describing how the source was reduced to the served index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub source_records: usize,
    pub dropped_leading: usize,
    pub dropped_incomplete: usize,
    pub outside_window: usize,
    pub served: usize,
}

/// Sorted, lag-augmented records restricted to the service window.
///
/// Never mutated after [`DatasetIndex::build`]; lookups are pure reads.
#[derive(Debug, Clone)]
pub struct DatasetIndex {
    records: Vec<Record>,
    window: ServiceWindow,
    feature_names: BTreeSet<String>,
    stats: BuildStats,
}

impl DatasetIndex {
    /// Sort, derive lags, drop incomplete rows and restrict to the window
    pub fn build(mut raw: Vec<RawRecord>, window: ServiceWindow) -> Result<Self, DatasetError> {
        if raw.is_empty() {
            return Err(DatasetError::Empty);
        }

        raw.sort_by_key(|r| r.date);

        if let Some(pair) = raw.windows(2).find(|pair| pair[0].date == pair[1].date) {
            return Err(DatasetError::DuplicateDate(pair[0].date));
        }

        let feature_names: BTreeSet<String> = raw
            .iter()
            .flat_map(|r| r.features.keys().cloned())
            .collect();

        let mut stats = BuildStats {
            source_records: raw.len(),
            ..BuildStats::default()
        };
        let mut records = Vec::with_capacity(raw.len());

        for (idx, current) in raw.iter().enumerate() {
            if idx < 2 {
                stats.dropped_leading += 1;
                continue;
            }

            let Some(record) = complete_record(current, &raw[idx - 1], &raw[idx - 2], &feature_names)
            else {
                stats.dropped_incomplete += 1;
                continue;
            };

            if !window.contains(record.date()) {
                stats.outside_window += 1;
                continue;
            }

            records.push(record);
        }

        if records.is_empty() {
            return Err(DatasetError::NoRecordsInWindow {
                start: window.start(),
                end: window.end(),
            });
        }

        stats.served = records.len();
        debug!(?stats, "Dataset index built");

        Ok(Self {
            records,
            window,
            feature_names,
            stats,
        })
    }

    /// Zero-or-one record for an exact date
    pub fn lookup_by_date(&self, date: NaiveDate) -> Option<&Record> {
        self.records
            .binary_search_by_key(&date, Record::date)
            .ok()
            .map(|idx| &self.records[idx])
    }

    /// Records with `start <= date <= end`, ascending
    pub fn lookup_by_range(&self, start: NaiveDate, end: NaiveDate) -> &[Record] {
        if start > end {
            return &[];
        }

        let lo = self.records.partition_point(|r| r.date() < start);
        let hi = self.records.partition_point(|r| r.date() <= end);
        &self.records[lo..hi]
    }

    /// Resolve a query against the index
    pub fn lookup(&self, query: &DateQuery) -> &[Record] {
        match *query {
            DateQuery::Day(date) => self
                .lookup_by_date(date)
                .map(std::slice::from_ref)
                .unwrap_or(&[]),
            DateQuery::Range { start, end } => self.lookup_by_range(start, end),
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn window(&self) -> ServiceWindow {
        self.window
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(Record::date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(Record::date)
    }

    /// Raw feature columns present in the source (lag columns excluded)
    pub fn feature_names(&self) -> &BTreeSet<String> {
        &self.feature_names
    }

    pub fn stats(&self) -> BuildStats {
        self.stats
    }
}

fn complete_record(
    current: &RawRecord,
    prev1: &RawRecord,
    prev2: &RawRecord,
    feature_names: &BTreeSet<String>,
) -> Option<Record> {
    let value = current.value.filter(|v| v.is_finite())?;
    let lag1 = prev1.value.filter(|v| v.is_finite())?;
    let lag2 = prev2.value.filter(|v| v.is_finite())?;

    let mut record = Record::new(current.date, value, lag1, lag2);

    for name in feature_names {
        let cell = current
            .features
            .get(name)
            .copied()
            .flatten()
            .filter(|v| v.is_finite())?;
        record = record.with_feature(name.clone(), cell);
    }

    Some(record)
}
