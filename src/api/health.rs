//! Liveness, health and readiness endpoints

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use super::state::AppState;
use crate::api::types::Json;
use crate::infrastructure::services::ServiceStatus;

/// Plain-text marker returned by `GET /`
pub const RUNNING_MESSAGE: &str = "UD prediction service is running";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
}

#[derive(Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}

/// Readiness payload describing what is being served
#[derive(Serialize)]
pub struct ReadyResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(flatten)]
    pub service: ServiceStatus,
}

/// GET /
pub async fn root() -> &'static str {
    RUNNING_MESSAGE
}

/// Simple health check - returns 200 if the service is running
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

/// Liveness check for container probes
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Dataset, schema and model are loaded before the listener binds, so a
/// running process is always ready; the body reports what it serves.
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let response = ReadyResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        service: state.handler.status(),
    };

    (StatusCode::OK, Json(response))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::ServiceWindow;

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: HealthStatus::Healthy,
            version: "1.0.0".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"status":"healthy","version":"1.0.0"}"#);
    }

    #[test]
    fn test_ready_response_flattens_status() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        let response = ReadyResponse {
            status: HealthStatus::Healthy,
            version: "1.0.0".to_string(),
            service: ServiceStatus {
                model: "ud-linear".to_string(),
                schema_version: "1".to_string(),
                features: vec!["UD_lag_1".to_string(), "UD_lag_2".to_string()],
                records: 29,
                window: ServiceWindow::new(day(1), day(31)).unwrap(),
                first_date: Some(day(3)),
                last_date: Some(day(31)),
            },
        };

        let json: serde_json::Value = serde_json::to_value(&response).unwrap();
        assert_eq!(json["model"], "ud-linear");
        assert_eq!(json["records"], 29);
        assert_eq!(json["window"]["start"], "2024-01-01");
        assert_eq!(json["first_date"], "2024-01-03");
    }
}
