//! Infrastructure layer - Data sources, model artifacts and services

pub mod dataset;
pub mod logging;
pub mod model;
pub mod observability;
pub mod services;
