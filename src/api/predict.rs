//! Prediction endpoint

use axum::extract::State;

use super::state::AppState;
use super::types::{ApiError, Json, PredictionResponse};
use crate::domain::PredictionRequest;

/// POST /predict
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictionRequest>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let result = state.handler.handle(request).await?;

    Ok(Json(PredictionResponse::from(result)))
}
