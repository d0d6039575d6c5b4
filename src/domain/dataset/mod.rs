//! Dataset domain - Lag-augmented, window-restricted UD history

mod index;
mod record;
mod window;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::DomainError;

pub use index::{BuildStats, DatasetIndex};
pub use record::{RawRecord, Record, LAG1_COLUMN, LAG2_COLUMN};
pub use window::ServiceWindow;

/// Errors raised while building the dataset index
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DatasetError {
    #[error("dataset source contains no records")]
    Empty,

    #[error("duplicate record for date {0}")]
    DuplicateDate(NaiveDate),

    #[error("invalid service window: start {start} is after end {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },

    #[error("no complete records between {start} and {end}")]
    NoRecordsInWindow { start: NaiveDate, end: NaiveDate },

    #[error("{0}")]
    Source(String),
}

impl From<DatasetError> for DomainError {
    fn from(err: DatasetError) -> Self {
        DomainError::dataset(err.to_string())
    }
}
