//! Query command - one prediction through the same pipeline as `POST /predict`

use clap::Args;

use crate::api::types::{ApiError, PredictionResponse};
use crate::domain::PredictionRequest;
use crate::infrastructure::services::PredictionHandlerTrait;

#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Single date, YYYY-MM-DD
    #[arg(long)]
    pub date: Option<String>,

    /// Whole month, YYYY-MM
    #[arg(long)]
    pub month: Option<String>,
}

impl From<QueryArgs> for PredictionRequest {
    fn from(args: QueryArgs) -> Self {
        PredictionRequest {
            date: args.date,
            month: args.month,
        }
    }
}

/// Print the response body to stdout; errors use the HTTP error message
pub async fn run(args: QueryArgs) -> anyhow::Result<()> {
    let config = super::load_config()?;
    let handler = crate::build_request_handler(&config)?;

    match handler.handle(args.into()).await {
        Ok(result) => {
            let body = serde_json::to_string_pretty(&PredictionResponse::from(result))?;
            println!("{}", body);
            Ok(())
        }
        Err(err) => {
            let api_error = ApiError::from(err);
            Err(anyhow::anyhow!(api_error.message().to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::{Cli, Command};

    #[test]
    fn test_parse_query_date() {
        let cli = Cli::parse_from(["ud-predict", "query", "--date", "2024-03-15"]);

        match cli.command {
            Command::Query(args) => {
                let request = PredictionRequest::from(args);
                assert_eq!(request, PredictionRequest::for_date("2024-03-15"));
            }
            _ => panic!("expected query command"),
        }
    }

    #[test]
    fn test_parse_query_month() {
        let cli = Cli::parse_from(["ud-predict", "query", "--month", "2024-02"]);

        match cli.command {
            Command::Query(args) => {
                assert_eq!(
                    PredictionRequest::from(args),
                    PredictionRequest::for_month("2024-02")
                );
            }
            _ => panic!("expected query command"),
        }
    }
}
