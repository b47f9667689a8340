//! Configuration file loading and validation.

use std::path::Path;

use crate::error::ConfigError;
use crate::types::{DiagramConfig, MAX_INITIAL_CAPACITY};

/// File name looked up by [`load_config`].
pub const CONFIG_FILE: &str = "diagram.toml";

/// Loads and validates a `diagram.toml` configuration from a directory.
///
/// Reads `<dir>/diagram.toml`, parses it, and validates the cache settings.
pub fn load_config(dir: &Path) -> Result<DiagramConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `diagram.toml` configuration from a string.
///
/// Missing sections and keys take their defaults, so an empty string is a
/// valid configuration.
pub fn load_config_from_str(content: &str) -> Result<DiagramConfig, ConfigError> {
    let config: DiagramConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &DiagramConfig) -> Result<(), ConfigError> {
    let capacity = config.cache.initial_capacity;
    if capacity > MAX_INITIAL_CAPACITY {
        return Err(ConfigError::ValidationError(format!(
            "cache.initial_capacity must be at most {MAX_INITIAL_CAPACITY}, got {capacity}"
        )));
    }
    Ok(())
}
