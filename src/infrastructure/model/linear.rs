//! Ordinary least squares regressor

use serde::Deserialize;

use crate::domain::ModelError;

/// `y = intercept + Σ coefficients[i] * x[i]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinearRegressor {
    pub coefficients: Vec<f64>,
    #[serde(default)]
    pub intercept: f64,
}

impl LinearRegressor {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.coefficients.is_empty() {
            return Err(ModelError::InvalidArtifact(
                "linear regressor has no coefficients".to_string(),
            ));
        }

        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelError::InvalidArtifact(
                "linear regressor has non-finite parameters".to_string(),
            ));
        }

        Ok(())
    }

    pub fn input_width(&self) -> usize {
        self.coefficients.len()
    }

    pub fn predict_row(&self, row: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(row)
            .fold(self.intercept, |acc, (c, x)| acc + c * x)
    }
}
