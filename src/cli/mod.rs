//! CLI module for the UD prediction service
//!
//! Provides subcommands:
//! - `serve`: run the HTTP API
//! - `check`: load everything and run the startup checks, then exit
//! - `query`: answer one request from the command line

pub mod check;
pub mod query;
pub mod serve;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;

/// UD Prediction API - actual vs. predicted UD for historical dates
#[derive(Parser)]
#[command(name = "ud-predict")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Validate configuration, dataset, feature schema and model
    Check,

    /// Run a single prediction and print the JSON response
    Query(query::QueryArgs),
}

/// Load `.env`, configuration files and environment overrides, then validate
pub fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;

    Ok(config)
}
