//! Regression model contract

use thiserror::Error;

use crate::domain::features::FeatureMatrix;

#[cfg(test)]
use mockall::automock;

/// Failures raised by a model implementation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("model expects {expected} input features, got {actual}")]
    InputWidth { expected: usize, actual: usize },

    #[error("invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("model evaluation failed: {0}")]
    Evaluation(String),
}

/// A pre-trained regressor mapping feature rows to scalar predictions.
///
/// Implementations are loaded once and shared read-only across requests.
#[cfg_attr(test, automock)]
pub trait RegressionModel: Send + Sync {
    /// One prediction per input row, in input order
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>, ModelError>;

    /// Number of input features the model was trained on
    fn input_width(&self) -> usize;

    /// Feature names recorded at training time, if the artifact carries them
    fn feature_names(&self) -> Option<Vec<String>>;

    /// Human-readable model name for logs and readiness output
    fn name(&self) -> String;
}
