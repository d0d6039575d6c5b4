use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::health;
use super::middleware::{logging_middleware, metrics_middleware, security_headers_middleware};
use super::predict;
use super::state::AppState;
use crate::config::{AppConfig, ServerConfig};
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/predict", post(predict::predict))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .with_state(state)
}

/// Router with middleware, CORS and the optional metrics endpoint
pub fn create_app_router(
    state: AppState,
    config: &AppConfig,
    metrics: Option<PrometheusMetrics>,
) -> Router {
    let mut router = create_router_with_state(state);

    if let Some(m) = metrics {
        router = router.merge(create_metrics_router(m, &config.metrics.path));
    }

    router
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http())
}

/// Empty origin list allows any origin
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.cors_allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(origins)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use chrono::NaiveDate;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::{DomainError, PredictionRequest, ResponseFormatter, Record, ServiceWindow};
    use crate::infrastructure::services::{MockPredictionHandlerTrait, ServiceStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn app(handler: MockPredictionHandlerTrait) -> Router {
        create_app_router(
            AppState::new(Arc::new(handler)),
            &AppConfig::default(),
            None,
        )
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn post_predict(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_root_is_plain_text_marker() {
        let response = app(MockPredictionHandlerTrait::new())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "UD prediction service is running");
    }

    #[tokio::test]
    async fn test_predict_success_body() {
        let mut handler = MockPredictionHandlerTrait::new();
        handler
            .expect_handle()
            .withf(|request| request.date_field() == Some("2024-03-15"))
            .returning(|_| {
                let records = vec![Record::new(date(2024, 3, 15), 9.0, 12.0, 10.0)];
                ResponseFormatter::format(&records, &[10.5])
            });

        let response = app(handler)
            .oneshot(post_predict(r#"{"date": "2024-03-15"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_string(response).await,
            r#"{"2024-03-15":{"actual_UD":9.0,"predicted_UD":10.5}}"#
        );
    }

    #[tokio::test]
    async fn test_predict_validation_error() {
        let mut handler = MockPredictionHandlerTrait::new();
        handler
            .expect_handle()
            .withf(|request| *request == PredictionRequest::default())
            .returning(|_| Err(DomainError::validation("Please specify a date or month")));

        let response = app(handler).oneshot(post_predict("{}")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_string(response).await,
            r#"{"error":"Please specify a date or month"}"#
        );
    }

    #[tokio::test]
    async fn test_predict_no_data() {
        let mut handler = MockPredictionHandlerTrait::new();
        handler.expect_handle().returning(|_| {
            Err(DomainError::not_found(
                "No data found for the specified date or month",
            ))
        });

        let response = app(handler)
            .oneshot(post_predict(r#"{"date": "2023-12-31"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_string(response).await,
            r#"{"error":"No data found for the specified date or month"}"#
        );
    }

    #[tokio::test]
    async fn test_predict_fault_is_masked() {
        let mut handler = MockPredictionHandlerTrait::new();
        handler
            .expect_handle()
            .returning(|_| Err(DomainError::inference("model inference failed")));

        let response = app(handler)
            .oneshot(post_predict(r#"{"month": "2024-03"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_string(response).await,
            r#"{"error":"An error occurred while processing the request"}"#
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let mut handler = MockPredictionHandlerTrait::new();
        handler.expect_handle().never();

        let response = app(handler).oneshot(post_predict("not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(response).await, r#"{"error":"Bad request"}"#);
    }

    #[tokio::test]
    async fn test_array_body_is_bad_request() {
        for body in [r#"["2024-03-15"]"#, r#"[null, "2024-03"]"#, "[]"] {
            let mut handler = MockPredictionHandlerTrait::new();
            handler.expect_handle().never();

            let response = app(handler).oneshot(post_predict(body)).await.unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(body_string(response).await, r#"{"error":"Bad request"}"#);
        }
    }

    /// Router over a handler loaded from CSV, schema and model files
    fn loaded_app(dir: &std::path::Path) -> Router {
        let write = |name: &str, contents: &str| {
            std::fs::write(dir.join(name), contents).unwrap();
            dir.join(name)
        };

        let mut config = AppConfig::default();
        config.dataset.path = write(
            "history.csv",
            "DATE,UD\n2024-03-12,8\n2024-03-13,10\n2024-03-14,12\n2024-03-15,9\n",
        );
        config.model.schema_path = write(
            "schema.json",
            r#"{"version": "1", "columns": ["UD_lag_1", "UD_lag_2"]}"#,
        );
        config.model.path = write(
            "model.json",
            r#"{
                "name": "ud-linear",
                "feature_names": ["UD_lag_1", "UD_lag_2"],
                "regressor": {"type": "linear", "coefficients": [0.5, 0.25], "intercept": 1.0}
            }"#,
        );

        let handler = crate::build_request_handler(&config).unwrap();
        create_app_router(AppState::new(Arc::new(handler)), &config, None)
    }

    #[tokio::test]
    async fn test_loaded_handler_serves_lagged_prediction() {
        let dir = tempfile::tempdir().unwrap();
        let router = loaded_app(dir.path());

        // lag1 = 12 (03-14), lag2 = 10 (03-13): 1.0 + 0.5 * 12 + 0.25 * 10
        let first = router
            .clone()
            .oneshot(post_predict(r#"{"date": "2024-03-15"}"#))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        let first = body_string(first).await;
        assert_eq!(first, r#"{"2024-03-15":{"actual_UD":9.0,"predicted_UD":9.5}}"#);

        let second = router
            .oneshot(post_predict(r#"{"date": "2024-03-15"}"#))
            .await
            .unwrap();
        assert_eq!(body_string(second).await, first);
    }

    #[tokio::test]
    async fn test_loaded_handler_month_and_errors() {
        let dir = tempfile::tempdir().unwrap();
        let router = loaded_app(dir.path());

        let month = router
            .clone()
            .oneshot(post_predict(r#"{"month": "2024-03"}"#))
            .await
            .unwrap();
        assert_eq!(month.status(), StatusCode::OK);
        assert_eq!(
            body_string(month).await,
            concat!(
                r#"{"2024-03-14":{"actual_UD":12.0,"predicted_UD":8.0},"#,
                r#""2024-03-15":{"actual_UD":9.0,"predicted_UD":9.5}}"#
            )
        );

        // leading rows without two prior observations are not served
        let dropped = router
            .clone()
            .oneshot(post_predict(r#"{"date": "2024-03-13"}"#))
            .await
            .unwrap();
        assert_eq!(dropped.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_string(dropped).await,
            r#"{"error":"No data found for the specified date or month"}"#
        );

        let unpadded = router
            .oneshot(post_predict(r#"{"date": "2024-3-15"}"#))
            .await
            .unwrap();
        assert_eq!(unpadded.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_ready_reports_status() {
        let mut handler = MockPredictionHandlerTrait::new();
        handler.expect_status().returning(|| ServiceStatus {
            model: "ud-linear".to_string(),
            schema_version: "1".to_string(),
            features: vec!["UD_lag_1".to_string(), "UD_lag_2".to_string()],
            records: 150,
            window: ServiceWindow::new(date(2024, 1, 1), date(2024, 5, 31)).unwrap(),
            first_date: Some(date(2024, 1, 1)),
            last_date: Some(date(2024, 5, 31)),
        });

        let response = app(handler)
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["records"], 150);
        assert_eq!(json["model"], "ud-linear");
    }

    #[tokio::test]
    async fn test_cors_allows_cross_origin_requests() {
        let response = app(MockPredictionHandlerTrait::new())
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_security_headers_present() {
        let response = app(MockPredictionHandlerTrait::new())
            .oneshot(Request::builder().uri("/live").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::X_CONTENT_TYPE_OPTIONS).unwrap(),
            "nosniff"
        );
    }
}
