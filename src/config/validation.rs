//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, attempts > 0)
//! - Check the node URL and contract names are well formed
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClaimConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::chain::transaction::MAX_EXPIRATION_SECS;
use crate::chain::types::is_valid_name;
use crate::config::schema::ClaimConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &ClaimConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match url::Url::parse(&config.node.url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            "node.url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            "node.url",
            format!("invalid URL '{}': {}", config.node.url, e),
        )),
    }

    if config.node.timeout_secs == 0 {
        errors.push(ValidationError::new("node.timeout_secs", "must be greater than 0"));
    }
    if config.signing.max_attempts == 0 {
        errors.push(ValidationError::new("signing.max_attempts", "must be greater than 0"));
    }
    if config.transaction.expiration_secs == 0
        || config.transaction.expiration_secs > MAX_EXPIRATION_SECS
    {
        errors.push(ValidationError::new(
            "transaction.expiration_secs",
            format!("must be between 1 and {}", MAX_EXPIRATION_SECS),
        ));
    }

    for (field, value) in [
        ("transaction.contract", &config.transaction.contract),
        ("transaction.action", &config.transaction.action),
        ("transaction.permission", &config.transaction.permission),
    ] {
        if !is_valid_name(value) {
            errors.push(ValidationError::new(field, format!("'{}' is not a valid name", value)));
        }
    }

    if config.cleos.binary.trim().is_empty() {
        errors.push(ValidationError::new("cleos.binary", "must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ClaimConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ClaimConfig::default();
        config.node.url = "not a url".to_string();
        config.node.timeout_secs = 0;
        config.transaction.contract = "Bad_Contract".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.field == "node.url"));
        assert!(errors.iter().any(|e| e.field == "node.timeout_secs"));
        assert!(errors.iter().any(|e| e.field == "transaction.contract"));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let mut config = ClaimConfig::default();
        config.node.url = "ftp://127.0.0.1:8888".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "node.url");
        assert!(errors[0].message.contains("ftp"));
    }
}
