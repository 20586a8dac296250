//! Configuration loading from disk.

use std::path::Path;
use std::fs;

use thiserror::Error;

use crate::config::schema::ExecutorConfig;
use crate::config::validation::{validate_config, PolicyError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {0}")]
    Validation(PolicyError),
}

/// Run semantic validation on an already assembled config.
pub fn check_config(config: &ExecutorConfig) -> Result<(), ConfigError> {
    validate_config(config).map_err(|errors| ConfigError::Validation(PolicyError(errors)))
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ExecutorConfig, ConfigError> {
    let config: ExecutorConfig = toml::from_str(content)?;
    check_config(&config)?;
    Ok(config)
}

/// Read a TOML file without semantic validation.
///
/// For callers that layer overrides on top of the file and validate the
/// merged result with [`check_config`].
pub fn read_config(path: &Path) -> Result<ExecutorConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ExecutorConfig, ConfigError> {
    let config = read_config(path)?;
    check_config(&config)?;
    Ok(config)
}
