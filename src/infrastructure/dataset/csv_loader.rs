//! CSV loader for the UD history table

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use tracing::{debug, warn};

use crate::config::DatasetConfig;
use crate::domain::{DatasetError, RawRecord};

/// Accepted calendar date layouts for the date column
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];

/// Timestamp layouts whose time part is discarded
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Reads dated UD rows from a headered CSV file.
///
/// Every column other than the date and target columns becomes a named
/// numeric feature. Empty numeric cells load as missing values and are
/// dropped later by the index; unparseable cells fail the load.
#[derive(Debug, Clone)]
pub struct CsvDatasetSource {
    date_column: String,
    target_column: String,
}

impl CsvDatasetSource {
    pub fn new(date_column: impl Into<String>, target_column: impl Into<String>) -> Self {
        Self {
            date_column: date_column.into(),
            target_column: target_column.into(),
        }
    }

    pub fn from_config(config: &DatasetConfig) -> Self {
        Self::new(&config.date_column, &config.target_column)
    }

    pub fn load_path(&self, path: &Path) -> Result<Vec<RawRecord>, DatasetError> {
        let file = File::open(path).map_err(|e| {
            DatasetError::Source(format!("failed to open dataset '{}': {}", path.display(), e))
        })?;

        debug!(path = %path.display(), "Loading dataset");
        self.load_reader(file)
    }

    pub fn load_reader<R: Read>(&self, reader: R) -> Result<Vec<RawRecord>, DatasetError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| DatasetError::Source(format!("failed to read dataset headers: {}", e)))?
            .clone();

        let header_map = build_header_map(&headers);
        let date_idx = self.required_column(&header_map, &self.date_column)?;
        let target_idx = self.required_column(&header_map, &self.target_column)?;

        let feature_columns: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != date_idx && *idx != target_idx)
            .map(|(idx, name)| (idx, name.to_string()))
            .collect();

        let mut records = Vec::new();

        for (idx, result) in reader.records().enumerate() {
            // header occupies line 1
            let line = idx + 2;

            let row = result
                .map_err(|e| DatasetError::Source(format!("line {}: malformed row: {}", line, e)))?;

            let raw_date = row.get(date_idx).unwrap_or_default();
            if raw_date.is_empty() {
                warn!(line, "Skipping dataset row without a date");
                continue;
            }

            let date = parse_date(raw_date)
                .map_err(|e| DatasetError::Source(format!("line {}: {}", line, e)))?;

            let value = parse_cell(&row, target_idx, &self.target_column)
                .map_err(|e| DatasetError::Source(format!("line {}: {}", line, e)))?;

            let mut record = RawRecord::new(date, value);
            for (column_idx, name) in &feature_columns {
                let cell = parse_cell(&row, *column_idx, name)
                    .map_err(|e| DatasetError::Source(format!("line {}: {}", line, e)))?;
                record = record.with_feature(name.clone(), cell);
            }

            records.push(record);
        }

        debug!(
            rows = records.len(),
            features = feature_columns.len(),
            "Dataset rows loaded"
        );

        Ok(records)
    }

    fn required_column(
        &self,
        header_map: &HashMap<String, usize>,
        name: &str,
    ) -> Result<usize, DatasetError> {
        header_map
            .get(name)
            .copied()
            .ok_or_else(|| DatasetError::Source(format!("dataset is missing column '{}'", name)))
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.to_string(), idx))
        .collect()
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .ok_or_else(|| format!("invalid date '{}'", raw))
}

/// Empty cells are missing values; anything else must be a number
fn parse_cell(row: &StringRecord, idx: usize, column: &str) -> Result<Option<f64>, String> {
    let raw = row.get(idx).unwrap_or_default();
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }

    raw.parse::<f64>()
        .map(Some)
        .map_err(|_| format!("column '{}' has non-numeric value '{}'", column, raw))
}
