//! Observability infrastructure - Prometheus metrics

mod metrics;

pub use self::metrics::{
    create_metrics_router, init_metrics, record_dataset_size, record_http_request,
    record_inference, record_prediction, PredictionOutcome, PrometheusMetrics,
};
