//! Model artifact loading

mod artifact;
mod linear;
mod mlp;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::domain::{DomainError, FeatureSchema, ModelError, RegressionModel};

pub use artifact::{ArtifactModel, ModelArtifact, RegressorKind};
pub use linear::LinearRegressor;
pub use mlp::{Activation, DenseLayer, MlpRegressor, Scaler};

/// Load and validate a JSON model artifact
pub fn load_model(path: &Path) -> Result<Arc<dyn RegressionModel>, ModelError> {
    let json = fs::read_to_string(path).map_err(|e| {
        ModelError::InvalidArtifact(format!("failed to read '{}': {}", path.display(), e))
    })?;

    let model = ArtifactModel::from_json(&json)?;

    info!(
        path = %path.display(),
        name = %model.name(),
        kind = model.kind(),
        input_width = model.input_width(),
        "Model loaded"
    );

    Ok(Arc::new(model))
}

/// Load the ordered feature column list the model was trained on
pub fn load_feature_schema(path: &Path) -> Result<FeatureSchema, DomainError> {
    let json = fs::read_to_string(path).map_err(|e| {
        DomainError::configuration(format!(
            "failed to read feature schema '{}': {}",
            path.display(),
            e
        ))
    })?;

    let schema: FeatureSchema = serde_json::from_str(&json).map_err(|e| {
        DomainError::schema(format!("invalid feature schema '{}': {}", path.display(), e))
    })?;

    info!(
        path = %path.display(),
        version = schema.version(),
        columns = ?schema.columns(),
        "Feature schema loaded"
    );

    Ok(schema)
}
