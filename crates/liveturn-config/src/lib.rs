//! liveturn configuration.
//!
//! TOML config with per-section defaults so partial files work. The file
//! lives in the platform config directory and is created from a commented
//! template on first run.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    AudioConfig, GeminiConfig, LiveturnConfig, LogLevel, LoggingConfig, Modality, SessionConfig,
};
pub use toml_loader::{create_default_config, default_config_path, load_default, load_from_path};

use std::path::Path;

use liveturn_common::ConfigError;

/// Load and validate the config, from `path` if given or the platform
/// default otherwise.
pub fn load_config(path: Option<&Path>) -> Result<LiveturnConfig, ConfigError> {
    let config = match path {
        Some(path) => load_from_path(path)?,
        None => load_default()?,
    };
    validation::validate(&config)?;
    Ok(config)
}
