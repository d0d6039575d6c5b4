//! Domain layer - Core lookup and prediction logic

pub mod dataset;
pub mod error;
pub mod features;
pub mod prediction;
pub mod request;

pub use dataset::{
    BuildStats, DatasetError, DatasetIndex, RawRecord, Record, ServiceWindow, LAG1_COLUMN,
    LAG2_COLUMN,
};
pub use error::DomainError;
pub use features::{FeatureAssembler, FeatureMatrix, FeatureSchema, SchemaError};
pub use prediction::{
    ModelError, PredictionEntry, PredictionResult, RegressionModel, ResponseFormatter,
};
pub use request::{DateQuery, DateResolver, PredictionRequest, ValidationError};
