//! Prediction domain - Model contract and result formatting

mod formatter;
mod model;
mod result;

pub use formatter::ResponseFormatter;
#[cfg(test)]
pub use model::MockRegressionModel;
pub use model::{ModelError, RegressionModel};
pub use result::{PredictionEntry, PredictionResult};
