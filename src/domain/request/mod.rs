//! Request domain - Date/month requests and their resolution into lookup queries

mod entity;
mod resolver;

pub use entity::{DateQuery, PredictionRequest};
pub use resolver::{DateResolver, ValidationError, DATE_FORMAT, MISSING_DATE_OR_MONTH};
