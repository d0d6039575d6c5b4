//! Serviceable date window

use chrono::NaiveDate;
use serde::Serialize;

use super::DatasetError;

/// Inclusive date range the index restricts itself to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl ServiceWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DatasetError> {
        if start > end {
            return Err(DatasetError::InvalidWindow { start, end });
        }

        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
