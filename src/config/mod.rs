//! Configuration
//!
//! Layered settings: built-in defaults, an optional TOML file, then environment
//! variables prefixed with `SKETCH_HISTORY_` (nested keys joined by `__`).

pub mod loader;

pub use loader::ConfigLoader;

use crate::error::ApiError;
use crate::history::{DEFAULT_CAPACITY, MAX_CAPACITY};
use crate::layout::DEFAULT_LABEL_CHARS;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// History store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of nodes kept before eviction
    pub capacity: usize,
    /// Label length shown in the layout before truncation
    pub label_max_chars: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            label_max_chars: DEFAULT_LABEL_CHARS,
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub history: HistoryConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Reject settings the store cannot be built from.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.history.capacity == 0 || self.history.capacity > MAX_CAPACITY {
            return Err(ApiError::ConfigError(format!(
                "history.capacity must be between 1 and {}",
                MAX_CAPACITY
            )));
        }
        if self.history.label_max_chars == 0 {
            return Err(ApiError::ConfigError(
                "history.label_max_chars must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
