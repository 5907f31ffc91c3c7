//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ClaimConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding the node endpoint.
pub const API_URL_ENV_VAR: &str = "API_URL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ClaimConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ClaimConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load configuration from an optional file, then apply `API_URL`.
///
/// Without a path the defaults are used. The result is validated again
/// after the environment override so a bad `API_URL` is rejected here.
pub fn load(path: Option<&Path>) -> Result<ClaimConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => ClaimConfig::default(),
    };

    apply_env_overrides(&mut config, std::env::var(API_URL_ENV_VAR).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::debug!(
        node_url = %config.node.url,
        scheme = ?config.signing.scheme,
        max_attempts = config.signing.max_attempts,
        "Configuration loaded"
    );

    Ok(config)
}

/// Apply the node URL override, ignoring empty values.
pub fn apply_env_overrides(config: &mut ClaimConfig, api_url: Option<String>) {
    if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
        config.node.url = url.trim().trim_end_matches('/').to_string();
    }
}
