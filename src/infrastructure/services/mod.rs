//! Infrastructure services

mod prediction_service;
mod request_handler;

pub use prediction_service::{PredictionService, INFERENCE_FAILED};
#[cfg(test)]
pub use request_handler::MockPredictionHandlerTrait;
pub use request_handler::{
    PredictionHandlerTrait, RequestHandler, RequestStage, ServiceStatus, NO_DATA_FOUND,
};
