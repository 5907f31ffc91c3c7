//! Claim message construction and hashing schemes.

use alloy::primitives::{keccak256, B256};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::chain::tapos::Tapos;

/// Header of an Ethereum "personal sign" message.
pub const ETH_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// How the claim message is turned into the 32-byte digest that is signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SigningScheme {
    /// SHA-256 of the bare message.
    Plain,
    /// Keccak-256 of the prefixed, length-tagged message.
    #[default]
    EthPersonal,
}

impl SigningScheme {
    /// Hash `message` according to the scheme.
    pub fn digest(&self, message: &str) -> B256 {
        match self {
            SigningScheme::Plain => B256::from_slice(&Sha256::digest(message.as_bytes())),
            SigningScheme::EthPersonal => {
                let mut data = Vec::with_capacity(ETH_MESSAGE_PREFIX.len() + 20 + message.len());
                data.extend_from_slice(ETH_MESSAGE_PREFIX.as_bytes());
                data.extend_from_slice(message.len().to_string().as_bytes());
                data.extend_from_slice(message.as_bytes());
                keccak256(&data)
            }
        }
    }
}

/// Build the claim message binding the reference block to the target account.
pub fn claim_message(tapos: &Tapos, eos_pubkey: &str, eos_account: &str) -> String {
    format!(
        "{},{},{},{}",
        tapos.ref_block_num, tapos.ref_block_prefix, eos_pubkey, eos_account
    )
}
