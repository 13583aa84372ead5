//! Read config from a path or the platform default.

use std::path::Path;

use liveturn_common::ConfigError;
use tracing::info;

use crate::schema::LiveturnConfig;

use super::paths::{create_default_config, default_config_path};

/// Load config from a specific TOML file. Missing fields take their
/// defaults. Validation is left to the caller.
pub fn load_from_path(path: &Path) -> Result<LiveturnConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => {
            return Err(ConfigError::ParseError(format!(
                "failed to read {}: {e}",
                path.display()
            )))
        }
    };

    let config: LiveturnConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Load config from the platform default path, writing the commented
/// template there first if no file exists.
///
/// On macOS: `~/Library/Application Support/liveturn/config.toml`
/// On Linux: `~/.config/liveturn/config.toml`
pub fn load_default() -> Result<LiveturnConfig, ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            info!(path = %path.display(), "No config found, creating default");
            create_default_config(&path)?;
            load_from_path(&path)
        }
        other => other,
    }
}
