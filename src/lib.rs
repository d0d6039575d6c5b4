//! UD Prediction API
//!
//! Serves historical UD values alongside predictions from a pre-trained
//! regression model:
//! - Lag features derived once at startup from a CSV history
//! - Single-date and whole-month lookups over a fixed service window
//! - Versioned feature schema checked against the dataset and the model

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use self::config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use api::state::AppState;
use domain::DatasetIndex;
use infrastructure::dataset::CsvDatasetSource;
use infrastructure::model::{load_feature_schema, load_model};
use infrastructure::observability::record_dataset_size;
use infrastructure::services::{PredictionService, RequestHandler};
use tracing::info;

/// Load the dataset, feature schema and model and wire them into a handler.
///
/// Every startup check runs here; any failure aborts before serving.
pub fn build_request_handler(config: &AppConfig) -> anyhow::Result<RequestHandler> {
    let window = config.dataset.window()?;

    let raw = CsvDatasetSource::from_config(&config.dataset)
        .load_path(&config.dataset.path)
        .context("failed to load dataset")?;

    let index = DatasetIndex::build(raw, window).context("failed to build dataset index")?;
    let stats = index.stats();

    info!(
        source_records = stats.source_records,
        dropped_leading = stats.dropped_leading,
        dropped_incomplete = stats.dropped_incomplete,
        outside_window = stats.outside_window,
        served = stats.served,
        window_start = %window.start(),
        window_end = %window.end(),
        "Dataset index built"
    );
    record_dataset_size(index.len());

    let schema = load_feature_schema(&config.model.schema_path)?;
    let model = load_model(&config.model.path).context("failed to load model")?;

    let mut predictor = PredictionService::new(model);
    if let Some(timeout_ms) = config.model.inference_timeout_ms {
        predictor = predictor.with_timeout(Duration::from_millis(timeout_ms));
    }

    let handler = RequestHandler::new(Arc::new(index), Arc::new(schema), predictor)
        .context("feature schema does not match the dataset or the model")?;

    Ok(handler)
}

/// Create the application state with custom configuration
pub fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let handler = build_request_handler(config)?;

    Ok(AppState::new(Arc::new(handler)))
}
