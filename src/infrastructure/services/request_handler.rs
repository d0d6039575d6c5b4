//! Request handler - Resolve, look up, assemble, predict and format

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::PredictionService;
use crate::domain::{
    DatasetIndex, DateResolver, DomainError, FeatureAssembler, FeatureSchema, PredictionRequest,
    PredictionResult, ResponseFormatter, SchemaError, ServiceWindow,
};
use crate::infrastructure::observability::{record_prediction, PredictionOutcome};

#[cfg(test)]
use mockall::automock;

/// Message returned when a valid query matches no served record
pub const NO_DATA_FOUND: &str = "No data found for the specified date or month";

/// Progress of a single request through the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStage {
    Parsing,
    Resolving,
    Assembling,
    Predicting,
    Formatting,
    Done,
}

impl fmt::Display for RequestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestStage::Parsing => "parsing",
            RequestStage::Resolving => "resolving",
            RequestStage::Assembling => "assembling",
            RequestStage::Predicting => "predicting",
            RequestStage::Formatting => "formatting",
            RequestStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Snapshot of what the service is serving, for readiness output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceStatus {
    pub model: String,
    pub schema_version: String,
    pub features: Vec<String>,
    pub records: usize,
    pub window: ServiceWindow,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

/// Trait for the prediction pipeline (for dynamic dispatch in AppState)
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PredictionHandlerTrait: Send + Sync {
    /// Run one request to completion
    async fn handle(&self, request: PredictionRequest) -> Result<PredictionResult, DomainError>;

    /// Describe the loaded dataset, schema and model
    fn status(&self) -> ServiceStatus;
}

/// Owns the immutable dataset, schema and model for the life of the process
#[derive(Debug, Clone)]
pub struct RequestHandler {
    index: Arc<DatasetIndex>,
    assembler: FeatureAssembler,
    predictor: PredictionService,
}

impl RequestHandler {
    /// Wire the pipeline, rejecting schemas the dataset or model cannot satisfy
    pub fn new(
        index: Arc<DatasetIndex>,
        schema: Arc<FeatureSchema>,
        predictor: PredictionService,
    ) -> Result<Self, SchemaError> {
        let assembler = FeatureAssembler::new(schema);

        assembler.verify_dataset(&index)?;
        predictor.verify_schema(assembler.schema())?;

        Ok(Self {
            index,
            assembler,
            predictor,
        })
    }

    async fn run(
        &self,
        request: &PredictionRequest,
        stage: &mut RequestStage,
    ) -> Result<PredictionResult, DomainError> {
        advance(stage, RequestStage::Resolving);
        let query = DateResolver::resolve(request)?;

        let records = self.index.lookup(&query);
        if records.is_empty() {
            return Err(DomainError::not_found(NO_DATA_FOUND));
        }
        debug!(query = %query, records = records.len(), "Records matched");

        advance(stage, RequestStage::Assembling);
        let features = self.assembler.assemble(records)?;

        advance(stage, RequestStage::Predicting);
        let predictions = self.predictor.predict(features).await?;

        advance(stage, RequestStage::Formatting);
        let result = ResponseFormatter::format(records, &predictions)?;

        advance(stage, RequestStage::Done);
        Ok(result)
    }
}

fn advance(stage: &mut RequestStage, next: RequestStage) {
    debug!(from = %stage, to = %next, "Request stage");
    *stage = next;
}

fn outcome_for(err: &DomainError) -> PredictionOutcome {
    match err {
        DomainError::Validation { .. } => PredictionOutcome::InvalidRequest,
        DomainError::NotFound { .. } => PredictionOutcome::NoData,
        _ => PredictionOutcome::Failed,
    }
}

#[async_trait]
impl PredictionHandlerTrait for RequestHandler {
    async fn handle(&self, request: PredictionRequest) -> Result<PredictionResult, DomainError> {
        let started = Instant::now();
        let mut stage = RequestStage::Parsing;

        let result = self.run(&request, &mut stage).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(prediction) => {
                record_prediction(PredictionOutcome::Success, prediction.len());
                info!(
                    date = ?request.date_field(),
                    month = ?request.month_field(),
                    rows = prediction.len(),
                    elapsed_ms,
                    "Prediction served"
                );
            }
            Err(err) => {
                record_prediction(outcome_for(err), 0);
                if err.is_client_error() {
                    warn!(
                        stage = %stage,
                        date = ?request.date_field(),
                        month = ?request.month_field(),
                        error = %err,
                        "Prediction request rejected"
                    );
                } else {
                    error!(
                        stage = %stage,
                        date = ?request.date_field(),
                        month = ?request.month_field(),
                        error = %err,
                        elapsed_ms,
                        "Prediction request failed"
                    );
                }
            }
        }

        result
    }

    fn status(&self) -> ServiceStatus {
        let schema = self.assembler.schema();

        ServiceStatus {
            model: self.predictor.model_name(),
            schema_version: schema.version().to_string(),
            features: schema.columns().to_vec(),
            records: self.index.len(),
            window: self.index.window(),
            first_date: self.index.first_date(),
            last_date: self.index.last_date(),
        }
    }
}
