//! API types

pub mod error;
pub mod json;
pub mod prediction;

pub use error::{ApiError, ApiErrorResponse, BAD_REQUEST, GENERIC_ERROR};
pub use json::Json;
pub use prediction::PredictionResponse;
