//! Serialized model artifact and its [`RegressionModel`] implementation

use serde::Deserialize;

use super::linear::LinearRegressor;
use super::mlp::MlpRegressor;
use crate::domain::{FeatureMatrix, ModelError, RegressionModel};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RegressorKind {
    Linear(LinearRegressor),
    Mlp(MlpRegressor),
}

/// On-disk JSON layout of a trained model
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelArtifact {
    #[serde(default = "default_model_name")]
    pub name: String,
    /// Training-time column order, checked against the feature schema
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub regressor: RegressorKind,
}

fn default_model_name() -> String {
    "ud-regressor".to_string()
}

/// A validated artifact ready for inference
#[derive(Debug, Clone)]
pub struct ArtifactModel {
    artifact: ModelArtifact,
}

impl ArtifactModel {
    pub fn new(artifact: ModelArtifact) -> Result<Self, ModelError> {
        match &artifact.regressor {
            RegressorKind::Linear(linear) => linear.validate()?,
            RegressorKind::Mlp(mlp) => mlp.validate()?,
        }

        let model = Self { artifact };

        if let Some(names) = &model.artifact.feature_names {
            if names.len() != model.input_width() {
                return Err(ModelError::InvalidArtifact(format!(
                    "artifact lists {} feature names for {} inputs",
                    names.len(),
                    model.input_width()
                )));
            }
        }

        Ok(model)
    }

    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let artifact: ModelArtifact = serde_json::from_str(json)
            .map_err(|e| ModelError::InvalidArtifact(e.to_string()))?;
        Self::new(artifact)
    }

    pub fn kind(&self) -> &'static str {
        match self.artifact.regressor {
            RegressorKind::Linear(_) => "linear",
            RegressorKind::Mlp(_) => "mlp",
        }
    }

    fn predict_row(&self, row: &[f64]) -> Result<f64, ModelError> {
        match &self.artifact.regressor {
            RegressorKind::Linear(linear) => Ok(linear.predict_row(row)),
            RegressorKind::Mlp(mlp) => mlp.predict_row(row),
        }
    }
}

impl RegressionModel for ArtifactModel {
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>, ModelError> {
        let expected = self.input_width();
        if features.width() != expected {
            return Err(ModelError::InputWidth {
                expected,
                actual: features.width(),
            });
        }

        features
            .rows()
            .iter()
            .map(|row| self.predict_row(row))
            .collect()
    }

    fn input_width(&self) -> usize {
        match &self.artifact.regressor {
            RegressorKind::Linear(linear) => linear.input_width(),
            RegressorKind::Mlp(mlp) => mlp.input_width(),
        }
    }

    fn feature_names(&self) -> Option<Vec<String>> {
        self.artifact.feature_names.clone()
    }

    fn name(&self) -> String {
        self.artifact.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINEAR: &str = r#"{
        "name": "ud-linear",
        "feature_names": ["UD_lag_1", "UD_lag_2"],
        "regressor": {"type": "linear", "coefficients": [0.5, 0.25], "intercept": 1.0}
    }"#;

    const MLP: &str = r#"{
        "regressor": {
            "type": "mlp",
            "input_width": 2,
            "layers": [
                {"weights": [[1.0], [1.0]], "biases": [0.0], "activation": "relu"},
                {"weights": [[2.0]], "biases": [1.0]}
            ]
        }
    }"#;

    #[test]
    fn test_linear_artifact() {
        let model = ArtifactModel::from_json(LINEAR).unwrap();
        let features = FeatureMatrix::new(2, vec![vec![12.0, 10.0], vec![0.0, 0.0]]).unwrap();

        assert_eq!(model.name(), "ud-linear");
        assert_eq!(model.kind(), "linear");
        assert_eq!(model.input_width(), 2);
        assert_eq!(model.predict(&features).unwrap(), vec![9.5, 1.0]);
    }

    #[test]
    fn test_mlp_artifact_defaults() {
        let model = ArtifactModel::from_json(MLP).unwrap();
        let features = FeatureMatrix::new(2, vec![vec![1.0, 2.0]]).unwrap();

        assert_eq!(model.name(), "ud-regressor");
        assert_eq!(model.feature_names(), None);
        assert_eq!(model.kind(), "mlp");
        assert_eq!(model.predict(&features).unwrap(), vec![7.0]);
    }

    #[test]
    fn test_width_mismatch() {
        let model = ArtifactModel::from_json(LINEAR).unwrap();
        let features = FeatureMatrix::new(3, vec![vec![1.0, 2.0, 3.0]]).unwrap();

        assert_eq!(
            model.predict(&features).unwrap_err(),
            ModelError::InputWidth {
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn test_feature_name_count_must_match_width() {
        let json = r#"{
            "feature_names": ["UD_lag_1"],
            "regressor": {"type": "linear", "coefficients": [0.5, 0.25]}
        }"#;

        assert!(matches!(
            ArtifactModel::from_json(json),
            Err(ModelError::InvalidArtifact(_))
        ));
    }

    #[test]
    fn test_unknown_regressor_type() {
        let json = r#"{"regressor": {"type": "forest", "trees": []}}"#;

        assert!(matches!(
            ArtifactModel::from_json(json),
            Err(ModelError::InvalidArtifact(_))
        ));
    }
}
