//! Features domain - Explicit feature schema and model input assembly

mod assembler;
mod schema;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::DomainError;

pub use assembler::{FeatureAssembler, FeatureMatrix};
pub use schema::FeatureSchema;

/// Mismatches between records, the feature schema and the model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("feature schema declares no columns")]
    EmptyColumns,

    #[error("feature schema contains a blank column name")]
    BlankColumn,

    #[error("feature schema lists column '{0}' more than once")]
    DuplicateColumn(String),

    #[error("record {date} has no value for feature '{column}'")]
    MissingField { date: NaiveDate, column: String },

    #[error("feature '{0}' is not present in the dataset")]
    UnknownColumn(String),

    #[error("expected {expected} features, got {actual}")]
    WidthMismatch { expected: usize, actual: usize },

    #[error("feature #{position} is '{schema}' in the schema but '{model}' in the model")]
    NameMismatch {
        position: usize,
        schema: String,
        model: String,
    },
}

impl From<SchemaError> for DomainError {
    fn from(err: SchemaError) -> Self {
        DomainError::schema(err.to_string())
    }
}
