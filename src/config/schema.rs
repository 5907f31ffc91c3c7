//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the claim tool.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::signing::SigningScheme;

/// Default node endpoint when neither the config file nor `API_URL` set one.
pub const DEFAULT_NODE_URL: &str = "http://127.0.0.1:8888";

/// Root configuration for the claim tool.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClaimConfig {
    /// Chain node endpoint settings.
    pub node: NodeConfig,

    /// Message signing settings.
    pub signing: SigningConfig,

    /// Claim transaction settings.
    pub transaction: TransactionConfig,

    /// External chain CLI settings.
    pub cleos: CleosConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Chain node configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Base URL of the node HTTP API (e.g., "http://127.0.0.1:8888").
    pub url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_NODE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

/// Signing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SigningConfig {
    /// Message hashing scheme.
    pub scheme: SigningScheme,

    /// Maximum signing attempts while looking for a canonical signature.
    pub max_attempts: u32,

    /// Delay between signing attempts in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            scheme: SigningScheme::default(),
            max_attempts: 16,
            retry_delay_ms: 1000,
        }
    }
}

/// Claim transaction configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransactionConfig {
    /// Account hosting the claim contract.
    pub contract: String,

    /// Claim action name.
    pub action: String,

    /// Permission used when `--actor` carries none.
    pub permission: String,

    /// Seconds from now until the transaction expires.
    pub expiration_secs: u64,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            contract: "eosio.unregd".to_string(),
            action: "regaccount".to_string(),
            permission: "active".to_string(),
            expiration_secs: 180,
        }
    }
}

/// External chain CLI configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CleosConfig {
    /// Binary name or path.
    pub binary: String,
}

impl Default for CleosConfig {
    fn default() -> Self {
        Self {
            binary: "cleos".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter directive used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "unregd_claim=info".to_string(),
        }
    }
}
