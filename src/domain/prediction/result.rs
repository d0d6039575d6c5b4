//! Paired actual/predicted values per date

use chrono::NaiveDate;

/// Actual and predicted UD for one date
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionEntry {
    pub date: NaiveDate,
    pub actual: f64,
    pub predicted: f64,
}

/// Chronologically ordered prediction entries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionResult {
    entries: Vec<PredictionEntry>,
}

impl PredictionResult {
    pub(crate) fn from_entries(entries: Vec<PredictionEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[PredictionEntry] {
        &self.entries
    }

    pub fn get(&self, date: NaiveDate) -> Option<&PredictionEntry> {
        self.entries.iter().find(|e| e.date == date)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
