//! Feed-forward network regressor

use serde::Deserialize;

use crate::domain::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Tanh,
    Logistic,
    #[default]
    Identity,
}

impl Activation {
    fn apply(self, x: f64) -> f64 {
        match self {
            Activation::Relu => x.max(0.0),
            Activation::Tanh => x.tanh(),
            Activation::Logistic => 1.0 / (1.0 + (-x).exp()),
            Activation::Identity => x,
        }
    }
}

/// Standardization applied to inputs before the first layer
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Fully connected layer. `weights[i][j]` connects input `i` to unit `j`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<f64>,
    #[serde(default)]
    pub activation: Activation,
}

impl DenseLayer {
    fn inputs(&self) -> usize {
        self.weights.len()
    }

    fn units(&self) -> usize {
        self.biases.len()
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        let mut output = self.biases.clone();
        for (x, row) in input.iter().zip(&self.weights) {
            for (out, w) in output.iter_mut().zip(row) {
                *out += x * w;
            }
        }

        output
            .into_iter()
            .map(|v| self.activation.apply(v))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MlpRegressor {
    /// Declared input width; must agree with the first layer when present
    #[serde(default)]
    pub input_width: Option<usize>,
    #[serde(default)]
    pub scaler: Option<Scaler>,
    pub layers: Vec<DenseLayer>,
}

impl MlpRegressor {
    pub fn validate(&self) -> Result<(), ModelError> {
        let first = self
            .layers
            .first()
            .ok_or_else(|| invalid("network has no layers".to_string()))?;

        let width = first.inputs();
        if width == 0 {
            return Err(invalid("first layer has no inputs".to_string()));
        }

        if let Some(declared) = self.input_width {
            if declared != width {
                return Err(invalid(format!(
                    "declared input width {} but first layer takes {}",
                    declared, width
                )));
            }
        }

        let mut expected_inputs = width;
        for (position, layer) in self.layers.iter().enumerate() {
            if layer.inputs() != expected_inputs {
                return Err(invalid(format!(
                    "layer {} takes {} inputs, previous layer produces {}",
                    position,
                    layer.inputs(),
                    expected_inputs
                )));
            }

            if layer.units() == 0 {
                return Err(invalid(format!("layer {} has no units", position)));
            }

            if layer.weights.iter().any(|row| row.len() != layer.units()) {
                return Err(invalid(format!(
                    "layer {} weight rows must have {} entries",
                    position,
                    layer.units()
                )));
            }

            let finite = layer.biases.iter().all(|b| b.is_finite())
                && layer.weights.iter().flatten().all(|w| w.is_finite());
            if !finite {
                return Err(invalid(format!("layer {} has non-finite parameters", position)));
            }

            expected_inputs = layer.units();
        }

        if let Some(scaler) = &self.scaler {
            if scaler.mean.len() != width || scaler.scale.len() != width {
                return Err(invalid(format!("scaler must have {} entries", width)));
            }

            if scaler.scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
                return Err(invalid("scaler contains a zero or non-finite scale".to_string()));
            }
        }

        Ok(())
    }

    pub fn input_width(&self) -> usize {
        self.layers.first().map(DenseLayer::inputs).unwrap_or_default()
    }

    /// First unit of the output layer
    pub fn predict_row(&self, row: &[f64]) -> Result<f64, ModelError> {
        let mut activations: Vec<f64> = match &self.scaler {
            Some(scaler) => row
                .iter()
                .zip(scaler.mean.iter().zip(&scaler.scale))
                .map(|(x, (mean, scale))| (x - mean) / scale)
                .collect(),
            None => row.to_vec(),
        };

        for layer in &self.layers {
            activations = layer.forward(&activations);
        }

        activations
            .first()
            .copied()
            .ok_or_else(|| ModelError::Evaluation("network produced no output".to_string()))
    }
}

fn invalid(message: String) -> ModelError {
    ModelError::InvalidArtifact(message)
}
