//! ConfigLoader: composes sources and deserializes to AppConfig.

use super::AppConfig;
use crate::error::ApiError;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use std::path::Path;

/// Environment prefix for configuration overrides.
pub const ENV_PREFIX: &str = "SKETCH_HISTORY";

/// Configuration loader.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load defaults with the environment overlay.
    pub fn load() -> Result<AppConfig, ApiError> {
        Self::finish(Self::with_environment(Config::builder()))
    }

    /// Load a TOML file, then apply the environment overlay.
    /// Precedence: defaults (lowest) -> file -> environment (highest).
    pub fn load_from_file(path: &Path) -> Result<AppConfig, ApiError> {
        if !path.exists() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let builder = Config::builder().add_source(
            File::from(path)
                .format(FileFormat::Toml)
                .required(true),
        );
        Self::finish(Self::with_environment(builder))
    }

    fn with_environment(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
        builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<AppConfig, ApiError> {
        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
