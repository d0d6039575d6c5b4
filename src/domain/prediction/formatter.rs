//! Zips records with model output

use super::{PredictionEntry, PredictionResult};
use crate::domain::dataset::Record;
use crate::domain::DomainError;

/// Pairs each record's actual value with its prediction
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseFormatter;

impl ResponseFormatter {
    pub fn format(records: &[Record], predictions: &[f64]) -> Result<PredictionResult, DomainError> {
        if records.len() != predictions.len() {
            return Err(DomainError::internal(format!(
                "{} records but {} predictions",
                records.len(),
                predictions.len()
            )));
        }

        let entries = records
            .iter()
            .zip(predictions)
            .map(|(record, predicted)| PredictionEntry {
                date: record.date(),
                actual: record.value(),
                predicted: *predicted,
            })
            .collect();

        Ok(PredictionResult::from_entries(entries))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_pairs_in_record_order() {
        let records = vec![
            Record::new(date(2024, 3, 14), 12.0, 10.0, 8.0),
            Record::new(date(2024, 3, 15), 9.0, 12.0, 10.0),
        ];

        let result = ResponseFormatter::format(&records, &[11.5, 9.25]).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(
            result.entries()[0],
            PredictionEntry {
                date: date(2024, 3, 14),
                actual: 12.0,
                predicted: 11.5,
            }
        );
        assert_eq!(result.get(date(2024, 3, 15)).unwrap().predicted, 9.25);
    }

    #[test]
    fn test_length_mismatch_is_internal_error() {
        let records = vec![Record::new(date(2024, 3, 15), 9.0, 12.0, 10.0)];

        let err = ResponseFormatter::format(&records, &[]).unwrap_err();

        assert!(matches!(err, DomainError::Internal { .. }));
    }
}
