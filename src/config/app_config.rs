use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::{DatasetError, ServiceWindow};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; empty allows any origin
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Historical dataset source and serviceable window
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: PathBuf,
    pub date_column: String,
    pub target_column: String,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
}

/// Model artifact and feature schema locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub path: PathBuf,
    pub schema_path: PathBuf,
    /// Upper bound on a single inference call
    pub inference_timeout_ms: Option<u64>,
}

/// Prometheus metrics configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/ud_history.csv"),
            date_column: "DATE".to_string(),
            target_column: "UD".to_string(),
            window_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            window_end: NaiveDate::from_ymd_opt(2024, 5, 31).unwrap_or_default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("models/model.json"),
            schema_path: PathBuf::from("models/feature_schema.json"),
            inference_timeout_ms: None,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl DatasetConfig {
    pub fn window(&self) -> Result<ServiceWindow, DatasetError> {
        ServiceWindow::new(self.window_start, self.window_end)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Reject configurations the service cannot start with
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be greater than 0".to_string());
        }

        if self.dataset.path.as_os_str().is_empty() {
            return Err("dataset.path must not be empty".to_string());
        }

        if self.dataset.date_column.trim().is_empty() || self.dataset.target_column.trim().is_empty()
        {
            return Err("dataset.date_column and dataset.target_column must not be empty".to_string());
        }

        if self.dataset.date_column == self.dataset.target_column {
            return Err("dataset.date_column and dataset.target_column must differ".to_string());
        }

        self.dataset.window().map_err(|err| err.to_string())?;

        if self.model.path.as_os_str().is_empty() || self.model.schema_path.as_os_str().is_empty() {
            return Err("model.path and model.schema_path must not be empty".to_string());
        }

        if self.model.inference_timeout_ms == Some(0) {
            return Err("model.inference_timeout_ms must be greater than 0".to_string());
        }

        if !self.metrics.path.starts_with('/') {
            return Err("metrics.path must start with '/'".to_string());
        }

        Ok(())
    }
}
