//! Report errors.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised while building or writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Dataset {0} not found")]
    DatasetNotFound(String),

    #[error("No benchmark results to report")]
    EmptyResults,
}
