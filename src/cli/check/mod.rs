//! Check command - builds the full pipeline without binding a socket

use tracing::info;

use crate::infrastructure::logging;
use crate::infrastructure::services::PredictionHandlerTrait;

/// Load config, dataset, schema and model and run every startup check
pub async fn run() -> anyhow::Result<()> {
    let config = super::load_config()?;
    logging::init_logging(&config.logging);

    let handler = crate::build_request_handler(&config)?;
    let status = handler.status();

    info!(
        model = %status.model,
        schema_version = %status.schema_version,
        features = ?status.features,
        records = status.records,
        first_date = ?status.first_date,
        last_date = ?status.last_date,
        "Startup checks passed"
    );

    println!(
        "ok: model '{}' with schema {} ({} features), {} records from {} to {}",
        status.model,
        status.schema_version,
        status.features.len(),
        status.records,
        status.window.start(),
        status.window.end()
    );

    Ok(())
}
