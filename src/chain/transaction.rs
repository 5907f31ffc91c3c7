//! Transaction envelope and claim action payloads.
//!
//! # Responsibilities
//! - Model the claim action data and its authorization
//! - Build the unsigned transaction envelope handed to the external signer
//! - Compute expiration relative to the current time

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chain::tapos::Tapos;
use crate::chain::types::is_valid_name;

/// Timestamp layout expected by the node (UTC, no zone suffix).
pub const EXPIRATION_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Longest transaction lifetime a node accepts by default.
pub const MAX_EXPIRATION_SECS: u64 = 3600;

/// Errors raised while building claim payloads.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Invalid account name '{0}'")]
    InvalidAccount(String),

    #[error("Invalid public key '{0}'")]
    InvalidPublicKey(String),

    #[error("Invalid authorization '{0}': expected actor[@permission]")]
    InvalidAuthorization(String),
}

/// Data of the claim action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimArgs {
    /// Scheme-marked hex signature.
    pub signature: String,
    /// Account being claimed.
    pub account: String,
    /// Public key the account will be created with.
    pub eos_pubkey: String,
}

/// An `actor@permission` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionLevel {
    pub actor: String,
    pub permission: String,
}

impl PermissionLevel {
    /// Parse `actor` or `actor@permission`, filling in `default_permission`.
    pub fn parse(input: &str, default_permission: &str) -> Result<Self, PayloadError> {
        let (actor, permission) = match input.split_once('@') {
            Some((actor, permission)) => (actor, permission),
            None => (input, default_permission),
        };

        if !is_valid_name(actor) || !is_valid_name(permission) {
            return Err(PayloadError::InvalidAuthorization(input.to_string()));
        }

        Ok(Self {
            actor: actor.to_string(),
            permission: permission.to_string(),
        })
    }
}

impl std::fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.actor, self.permission)
    }
}

/// A single contract action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub account: String,
    pub name: String,
    pub authorization: Vec<PermissionLevel>,
    /// Binary action data, hex-encoded.
    pub data: String,
}

/// Unsigned transaction envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub expiration: String,
    pub ref_block_num: u16,
    pub ref_block_prefix: u32,
    pub max_net_usage_words: u32,
    pub max_cpu_usage_ms: u8,
    pub delay_sec: u32,
    pub context_free_actions: Vec<Action>,
    pub actions: Vec<Action>,
    pub transaction_extensions: Vec<serde_json::Value>,
    pub signatures: Vec<String>,
    pub context_free_data: Vec<String>,
}

impl Transaction {
    /// Build a single-action transaction bound to `tapos`.
    pub fn new(tapos: Tapos, expiration: DateTime<Utc>, action: Action) -> Self {
        Self {
            expiration: expiration.format(EXPIRATION_FORMAT).to_string(),
            ref_block_num: tapos.ref_block_num,
            ref_block_prefix: tapos.ref_block_prefix,
            max_net_usage_words: 0,
            max_cpu_usage_ms: 0,
            delay_sec: 0,
            context_free_actions: Vec::new(),
            actions: vec![action],
            transaction_extensions: Vec::new(),
            signatures: Vec::new(),
            context_free_data: Vec::new(),
        }
    }
}

/// Expiration `secs` seconds after `now`, capped at [`MAX_EXPIRATION_SECS`].
pub fn expiration_from(now: DateTime<Utc>, secs: u64) -> DateTime<Utc> {
    now + Duration::seconds(secs.min(MAX_EXPIRATION_SECS) as i64)
}

/// Check an account name given on the command line.
pub fn validate_account(account: &str) -> Result<(), PayloadError> {
    if is_valid_name(account) {
        Ok(())
    } else {
        Err(PayloadError::InvalidAccount(account.to_string()))
    }
}

/// Sanity-check a public key in legacy `EOS…` or `PUB_K1_…` form.
pub fn validate_public_key(key: &str) -> Result<(), PayloadError> {
    let body = key
        .strip_prefix("PUB_K1_")
        .or_else(|| key.strip_prefix("EOS"))
        .ok_or_else(|| PayloadError::InvalidPublicKey(key.to_string()))?;

    // 33-byte key plus 4-byte checksum encodes to 50 base58 characters.
    match bs58::decode(body).into_vec() {
        Ok(bytes) if bytes.len() == 37 => Ok(()),
        _ => Err(PayloadError::InvalidPublicKey(key.to_string())),
    }
}
