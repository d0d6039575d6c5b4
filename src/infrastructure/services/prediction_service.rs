//! Prediction service - Runs the shared regression model off the async runtime

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error};

use crate::domain::{DomainError, FeatureMatrix, FeatureSchema, RegressionModel, SchemaError};
use crate::infrastructure::observability::record_inference;

/// Generic message returned to callers when inference fails
pub const INFERENCE_FAILED: &str = "model inference failed";

/// Wraps a loaded model and enforces its output contract
#[derive(Clone)]
pub struct PredictionService {
    model: Arc<dyn RegressionModel>,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for PredictionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionService")
            .field("model", &self.model.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl PredictionService {
    pub fn new(model: Arc<dyn RegressionModel>) -> Self {
        Self {
            model,
            timeout: None,
        }
    }

    /// Bound how long a request waits for inference.
    ///
    /// A timed-out call still runs to completion on the blocking pool; only
    /// the waiting request is released with an inference failure.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn model_name(&self) -> String {
        self.model.name()
    }

    /// Check the schema against the model's input width and recorded feature names
    pub fn verify_schema(&self, schema: &FeatureSchema) -> Result<(), SchemaError> {
        let expected = self.model.input_width();
        if schema.width() != expected {
            return Err(SchemaError::WidthMismatch {
                expected,
                actual: schema.width(),
            });
        }

        if let Some(names) = self.model.feature_names() {
            let mismatch = schema
                .columns()
                .iter()
                .zip(&names)
                .enumerate()
                .find(|(_, (schema_column, model_column))| schema_column != model_column);

            if let Some((position, (schema_column, model_column))) = mismatch {
                return Err(SchemaError::NameMismatch {
                    position,
                    schema: schema_column.clone(),
                    model: model_column.clone(),
                });
            }
        }

        Ok(())
    }

    /// One prediction per row, in row order
    pub async fn predict(&self, features: FeatureMatrix) -> Result<Vec<f64>, DomainError> {
        let rows = features.len();
        let model_name = self.model.name();
        let model = Arc::clone(&self.model);
        let started = Instant::now();

        let task = tokio::task::spawn_blocking(move || model.predict(&features));

        let joined = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, task).await {
                Ok(joined) => joined,
                Err(_) => {
                    error!(model = %model_name, timeout_ms = limit.as_millis() as u64, "Model inference timed out");
                    record_inference(&model_name, false, started.elapsed());
                    return Err(DomainError::inference(INFERENCE_FAILED));
                }
            },
            None => task.await,
        };

        let outcome = match joined {
            Ok(Ok(predictions)) => check_output(rows, predictions),
            Ok(Err(e)) => Err(e.to_string()),
            Err(join_error) => Err(format!("inference task aborted: {}", join_error)),
        };

        let elapsed = started.elapsed();
        record_inference(&model_name, outcome.is_ok(), elapsed);

        match outcome {
            Ok(predictions) => {
                debug!(model = %model_name, rows, elapsed_us = elapsed.as_micros() as u64, "Model inference completed");
                Ok(predictions)
            }
            Err(detail) => {
                error!(model = %model_name, rows, error = %detail, "Model inference failed");
                Err(DomainError::inference(INFERENCE_FAILED))
            }
        }
    }
}

fn check_output(rows: usize, predictions: Vec<f64>) -> Result<Vec<f64>, String> {
    if predictions.len() != rows {
        return Err(format!(
            "model returned {} predictions for {} rows",
            predictions.len(),
            rows
        ));
    }

    if let Some(position) = predictions.iter().position(|p| !p.is_finite()) {
        return Err(format!("model returned a non-finite prediction at row {}", position));
    }

    Ok(predictions)
}
