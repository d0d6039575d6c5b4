//! Historical UD observations

use std::collections::BTreeMap;

use chrono::NaiveDate;

/// Feature column name for the value one step back
pub const LAG1_COLUMN: &str = "UD_lag_1";

/// Feature column name for the value two steps back
pub const LAG2_COLUMN: &str = "UD_lag_2";

/// One row of the dataset source before lag derivation.
///
/// Missing cells are kept as `None`; the index decides what to drop.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub date: NaiveDate,
    pub value: Option<f64>,
    pub features: BTreeMap<String, Option<f64>>,
}

impl RawRecord {
    pub fn new(date: NaiveDate, value: Option<f64>) -> Self {
        Self {
            date,
            value,
            features: BTreeMap::new(),
        }
    }

    pub fn with_feature(mut self, name: impl Into<String>, value: Option<f64>) -> Self {
        self.features.insert(name.into(), value);
        self
    }
}

/// A served observation with its derived lag features
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    date: NaiveDate,
    value: f64,
    lag1: f64,
    lag2: f64,
    features: BTreeMap<String, f64>,
}

impl Record {
    pub fn new(date: NaiveDate, value: f64, lag1: f64, lag2: f64) -> Self {
        Self {
            date,
            value,
            lag1,
            lag2,
            features: BTreeMap::new(),
        }
    }

    pub fn with_feature(mut self, name: impl Into<String>, value: f64) -> Self {
        self.features.insert(name.into(), value);
        self
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn lag1(&self) -> f64 {
        self.lag1
    }

    pub fn lag2(&self) -> f64 {
        self.lag2
    }

    /// Resolve a feature column by name, including the two lag columns
    pub fn feature(&self, column: &str) -> Option<f64> {
        match column {
            LAG1_COLUMN => Some(self.lag1),
            LAG2_COLUMN => Some(self.lag2),
            other => self.features.get(other).copied(),
        }
    }
}
