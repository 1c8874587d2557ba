//! Errors for the snow report service
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnowReportError {
    #[error("HTTP request failed")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error")]
    SerdeError(#[from] serde_json::Error),

    #[error("Configuration error")]
    ConfigError(#[from] config::ConfigError),

    #[error("Invalid configuration: {message}")]
    ConfigurationError { message: String },

    #[error("Report store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Invalid snapshot date: {0}")]
    InvalidDate(String),
}
