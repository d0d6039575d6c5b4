//! Feature vector assembly in schema order

use std::sync::Arc;

use super::{FeatureSchema, SchemaError};
use crate::domain::dataset::{DatasetIndex, Record, LAG1_COLUMN, LAG2_COLUMN};

/// Row-major feature rows, one per record, all of the same width
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    width: usize,
    rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    pub fn new(width: usize, rows: Vec<Vec<f64>>) -> Result<Self, SchemaError> {
        if let Some(row) = rows.iter().find(|row| row.len() != width) {
            return Err(SchemaError::WidthMismatch {
                expected: width,
                actual: row.len(),
            });
        }

        Ok(Self { width, rows })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Builds model input rows from records using a fixed [`FeatureSchema`]
#[derive(Debug, Clone)]
pub struct FeatureAssembler {
    schema: Arc<FeatureSchema>,
}

impl FeatureAssembler {
    pub fn new(schema: Arc<FeatureSchema>) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn assemble(&self, records: &[Record]) -> Result<FeatureMatrix, SchemaError> {
        let rows = records
            .iter()
            .map(|record| self.assemble_row(record))
            .collect::<Result<Vec<_>, _>>()?;

        FeatureMatrix::new(self.schema.width(), rows)
    }

    fn assemble_row(&self, record: &Record) -> Result<Vec<f64>, SchemaError> {
        self.schema
            .columns()
            .iter()
            .map(|column| {
                record
                    .feature(column)
                    .ok_or_else(|| SchemaError::MissingField {
                        date: record.date(),
                        column: column.clone(),
                    })
            })
            .collect()
    }

    /// Check that every schema column can be produced from the dataset
    pub fn verify_dataset(&self, index: &DatasetIndex) -> Result<(), SchemaError> {
        let available = index.feature_names();

        match self
            .schema
            .columns()
            .iter()
            .find(|c| c.as_str() != LAG1_COLUMN && c.as_str() != LAG2_COLUMN && !available.contains(*c))
        {
            Some(column) => Err(SchemaError::UnknownColumn(column.clone())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::dataset::{RawRecord, ServiceWindow};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn schema(columns: &[&str]) -> Arc<FeatureSchema> {
        Arc::new(
            FeatureSchema::new("1", columns.iter().map(|c| c.to_string()).collect()).unwrap(),
        )
    }

    #[test]
    fn test_assemble_follows_schema_order() {
        let assembler = FeatureAssembler::new(schema(&["UD_lag_1", "UD_lag_2", "RAIN"]));
        let records = vec![
            Record::new(date(2024, 3, 15), 9.0, 12.0, 10.0).with_feature("RAIN", 0.5),
            Record::new(date(2024, 3, 16), 7.0, 9.0, 12.0).with_feature("RAIN", 0.0),
        ];

        let matrix = assembler.assemble(&records).unwrap();

        assert_eq!(matrix.width(), 3);
        assert_eq!(matrix.rows(), [vec![12.0, 10.0, 0.5], vec![9.0, 12.0, 0.0]]);
    }

    #[test]
    fn test_reordered_schema_reorders_columns() {
        let assembler = FeatureAssembler::new(schema(&["RAIN", "UD_lag_2", "UD_lag_1"]));
        let record = Record::new(date(2024, 3, 15), 9.0, 12.0, 10.0).with_feature("RAIN", 0.5);

        let matrix = assembler.assemble(std::slice::from_ref(&record)).unwrap();

        assert_eq!(matrix.rows(), [vec![0.5, 10.0, 12.0]]);
    }

    #[test]
    fn test_missing_field_is_schema_error() {
        let assembler = FeatureAssembler::new(schema(&["UD_lag_1", "TEMP"]));
        let record = Record::new(date(2024, 3, 15), 9.0, 12.0, 10.0);

        let err = assembler.assemble(&[record]).unwrap_err();

        assert_eq!(
            err,
            SchemaError::MissingField {
                date: date(2024, 3, 15),
                column: "TEMP".to_string(),
            }
        );
    }

    #[test]
    fn test_assemble_empty_records() {
        let assembler = FeatureAssembler::new(schema(&["UD_lag_1"]));
        let matrix = assembler.assemble(&[]).unwrap();
        assert!(matrix.is_empty());
    }

    #[test]
    fn test_matrix_rejects_ragged_rows() {
        let err = FeatureMatrix::new(2, vec![vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        assert_eq!(
            err,
            SchemaError::WidthMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_verify_dataset_columns() {
        let raw = (1..=4)
            .map(|d| RawRecord::new(date(2024, 1, d), Some(d as f64)).with_feature("RAIN", Some(0.0)))
            .collect();
        let window = ServiceWindow::new(date(2024, 1, 1), date(2024, 12, 31)).unwrap();
        let index = DatasetIndex::build(raw, window).unwrap();

        assert!(FeatureAssembler::new(schema(&["UD_lag_1", "UD_lag_2", "RAIN"]))
            .verify_dataset(&index)
            .is_ok());

        let err = FeatureAssembler::new(schema(&["UD_lag_1", "TEMP"]))
            .verify_dataset(&index)
            .unwrap_err();
        assert_eq!(err, SchemaError::UnknownColumn("TEMP".to_string()));
    }
}
