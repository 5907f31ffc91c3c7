//! Chain-specific types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while talking to the chain node.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Connection or transport failure.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Request did not complete in time.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Node answered with a non-success HTTP status.
    #[error("Node returned HTTP {status} for {endpoint}: {body}")]
    Http {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    /// Response body could not be decoded.
    #[error("Unexpected response from {endpoint}: {reason}")]
    UnexpectedResponse {
        endpoint: &'static str,
        reason: String,
    },

    /// Block identifier is not usable for TAPOS extraction.
    #[error("Invalid block id '{id}': {reason}")]
    InvalidBlockId { id: String, reason: String },
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// Subset of `/v1/chain/get_info` the claim flow reads.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChainInfo {
    pub last_irreversible_block_id: String,
    #[serde(default)]
    pub last_irreversible_block_num: Option<u64>,
    #[serde(default)]
    pub head_block_num: Option<u64>,
    #[serde(default)]
    pub chain_id: Option<String>,
}

/// Body of `/v1/chain/abi_json_to_bin`.
#[derive(Debug, Clone, Serialize)]
pub struct AbiJsonToBinRequest<'a, T: Serialize> {
    pub code: &'a str,
    pub action: &'a str,
    pub args: &'a T,
}

/// Response of `/v1/chain/abi_json_to_bin`.
#[derive(Debug, Clone, Deserialize)]
pub struct AbiJsonToBinResponse {
    pub binargs: String,
}

/// Check an account, action or permission name.
///
/// Names are 1 to 12 characters from `a-z`, `1-5` and `.`, and may not
/// end with a dot.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 12
        && !name.ends_with('.')
        && name
            .bytes()
            .all(|b| matches!(b, b'a'..=b'z' | b'1'..=b'5' | b'.'))
}
