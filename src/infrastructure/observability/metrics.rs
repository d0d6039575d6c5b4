//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::MetricsConfig;

static DATE_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{4}-\d{2}(-\d{2})?").expect("valid date segment pattern"));

static NUMERIC_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\d+(/|$)").expect("valid numeric segment pattern"));

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// How a prediction request ended, used as a metric label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionOutcome {
    Success,
    InvalidRequest,
    NoData,
    Failed,
}

impl PredictionOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            PredictionOutcome::Success => "success",
            PredictionOutcome::InvalidRequest => "invalid_request",
            PredictionOutcome::NoData => "no_data",
            PredictionOutcome::Failed => "failed",
        }
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("ud_service_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics, path: &str) -> Router {
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Record the end of one prediction request
pub fn record_prediction(outcome: PredictionOutcome, rows: usize) {
    counter!("ud_predictions_total", "outcome" => outcome.as_str()).increment(1);

    if outcome == PredictionOutcome::Success {
        histogram!("ud_prediction_rows").record(rows as f64);
    }
}

/// Record how long the model took for one batch
pub fn record_inference(model: &str, success: bool, duration: Duration) {
    let labels = [
        ("model", model.to_string()),
        ("status", if success { "success" } else { "error" }.to_string()),
    ];

    histogram!("ud_inference_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Publish the number of serviceable records
pub fn record_dataset_size(records: usize) {
    gauge!("ud_dataset_records").set(records as f64);
}

/// Sanitize URL path for metric labels (collapse dates and IDs, limit cardinality)
fn sanitize_path(path: &str) -> String {
    let path = DATE_SEGMENT.replace_all(path, "{date}");
    let path = NUMERIC_SEGMENT.replace_all(&path, "/{id}$1");

    if path.len() > 50 {
        path.chars().take(50).collect()
    } else {
        path.to_string()
    }
}
