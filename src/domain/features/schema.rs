//! Versioned feature schema shared by the assembler and the model

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::SchemaError;

/// Ordered feature columns the model was trained on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FeatureSchemaFile")]
pub struct FeatureSchema {
    version: String,
    columns: Vec<String>,
}

#[derive(Deserialize)]
struct FeatureSchemaFile {
    version: String,
    columns: Vec<String>,
}

impl TryFrom<FeatureSchemaFile> for FeatureSchema {
    type Error = SchemaError;

    fn try_from(file: FeatureSchemaFile) -> Result<Self, Self::Error> {
        Self::new(file.version, file.columns)
    }
}

impl FeatureSchema {
    pub fn new(version: impl Into<String>, columns: Vec<String>) -> Result<Self, SchemaError> {
        if columns.is_empty() {
            return Err(SchemaError::EmptyColumns);
        }

        let mut seen = HashSet::with_capacity(columns.len());

        for column in &columns {
            if column.trim().is_empty() {
                return Err(SchemaError::BlankColumn);
            }

            if !seen.insert(column.as_str()) {
                return Err(SchemaError::DuplicateColumn(column.clone()));
            }
        }

        Ok(Self {
            version: version.into(),
            columns,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_schema() {
        let schema: FeatureSchema =
            serde_json::from_str(r#"{"version": "1", "columns": ["UD_lag_1", "UD_lag_2"]}"#)
                .unwrap();

        assert_eq!(schema.version(), "1");
        assert_eq!(schema.columns(), ["UD_lag_1", "UD_lag_2"]);
        assert_eq!(schema.width(), 2);
    }

    #[test]
    fn test_empty_columns_rejected() {
        let result: Result<FeatureSchema, _> =
            serde_json::from_str(r#"{"version": "1", "columns": []}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let err = FeatureSchema::new("1", vec!["A".to_string(), "A".to_string()]).unwrap_err();
        assert_eq!(err, SchemaError::DuplicateColumn("A".to_string()));
    }

    #[test]
    fn test_blank_column_rejected() {
        let err = FeatureSchema::new("1", vec![" ".to_string()]).unwrap_err();
        assert_eq!(err, SchemaError::BlankColumn);
    }
}
