//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::services::PredictionHandlerTrait;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<dyn PredictionHandlerTrait>,
}

impl AppState {
    pub fn new(handler: Arc<dyn PredictionHandlerTrait>) -> Self {
        Self { handler }
    }
}
