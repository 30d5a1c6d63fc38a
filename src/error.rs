//! Error types

use crate::types::NodeId;
use thiserror::Error;

/// Errors raised by the history store itself.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error("History node not found: #{0}")]
    NodeNotFound(NodeId),

    #[error("Invalid history capacity {0}: must be between 1 and {max}", max = crate::history::MAX_CAPACITY)]
    InvalidCapacity(usize),
}

/// Errors surfaced to callers of the configuration, logging and tooling layers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Replay script error: {0}")]
    ScriptError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    History(#[from] HistoryError),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::ScriptError(err.to_string())
    }
}
