//! Ethereum key handling and address derivation.
//!
//! # Security
//! - Keys are accepted from arguments, stdin or `ETH_PRIVATE_KEY`
//! - On a terminal, stdin is read through a no-echo prompt
//! - Keys are never logged or serialized

use std::io::{BufRead, IsTerminal};

use alloy::primitives::{hex, keccak256, Address};
use alloy::signers::local::PrivateKeySigner;
use k256::ecdsa::{SigningKey, VerifyingKey};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Environment variable holding the Ethereum private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "ETH_PRIVATE_KEY";

/// Prompt shown when the key is typed at a terminal.
pub const KEY_PROMPT: &str = "Ethereum private key: ";

/// Version byte of a wallet-import-format private key.
const WIF_VERSION: u8 = 0x80;

/// Suffix marking a key whose public key is used compressed.
const COMPRESSED_SUFFIX: u8 = 0x01;

/// Errors raised while loading keys.
#[derive(Debug, Error)]
pub enum WalletError {
    /// Key text is not valid hex or WIF, or is out of range.
    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    /// Key was expected in the environment but is missing.
    #[error("Environment variable {0} not set")]
    MissingEnv(&'static str),

    /// Key could not be read from stdin.
    #[error("Failed to read private key: {0}")]
    Read(#[from] std::io::Error),
}

/// Result type for wallet operations.
pub type WalletResult<T> = Result<T, WalletError>;

/// An Ethereum key pair used to sign claim messages.
#[derive(Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a hex or WIF private key.
    ///
    /// # Arguments
    /// * `private_key` - 64 hex digits (optional `0x`), 66 hex digits ending
    ///   in `01`, or a Base58Check WIF string
    pub fn from_private_key(private_key: &str) -> WalletResult<Self> {
        let bytes = parse_private_key(private_key)?;
        let signing_key = SigningKey::from_slice(&bytes)
            .map_err(|e| WalletError::InvalidKey(format!("key out of range: {}", e)))?;
        let signer = PrivateKeySigner::from_signing_key(signing_key);

        tracing::debug!(address = %signer.address(), "Wallet initialized");

        Ok(Self { signer })
    }

    /// Load wallet from `ETH_PRIVATE_KEY`.
    pub fn from_env() -> WalletResult<Self> {
        let private_key = std::env::var(PRIVATE_KEY_ENV_VAR)
            .map_err(|_| WalletError::MissingEnv(PRIVATE_KEY_ENV_VAR))?;

        Self::from_private_key(&private_key)
    }

    /// Read the key from the first line of `reader`.
    pub fn from_reader<R: BufRead>(mut reader: R) -> WalletResult<Self> {
        let mut line = String::new();
        reader.read_line(&mut line)?;
        Self::from_private_key(line.trim())
    }

    /// Read the key through `prompt`, which receives [`KEY_PROMPT`].
    pub fn from_prompt<F>(prompt: F) -> WalletResult<Self>
    where
        F: FnOnce(&str) -> std::io::Result<String>,
    {
        let key = prompt(KEY_PROMPT)?;
        Self::from_private_key(&key)
    }

    /// Read the key from stdin without echo when it is a terminal, or
    /// from its first line when piped.
    pub fn from_stdin() -> WalletResult<Self> {
        let stdin = std::io::stdin();
        if stdin.is_terminal() {
            Self::from_prompt(|prompt| rpassword::prompt_password(prompt))
        } else {
            Self::from_reader(stdin.lock())
        }
    }

    /// Load a wallet from a command-line value.
    ///
    /// `-` reads stdin, `None` falls back to `ETH_PRIVATE_KEY`.
    pub fn from_arg(arg: Option<&str>) -> WalletResult<Self> {
        match arg {
            Some("-") => Self::from_stdin(),
            Some(key) => Self::from_private_key(key),
            None => Self::from_env(),
        }
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// The secp256k1 signing key.
    pub fn signing_key(&self) -> &SigningKey {
        self.signer.credential()
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// Decode a private key from hex or wallet import format.
pub fn parse_private_key(input: &str) -> WalletResult<[u8; 32]> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(WalletError::InvalidKey("empty key".to_string()));
    }

    let unprefixed = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if unprefixed.bytes().all(|b| b.is_ascii_hexdigit()) {
        return parse_hex_key(unprefixed);
    }

    parse_wif_key(trimmed)
}

fn parse_hex_key(key: &str) -> WalletResult<[u8; 32]> {
    let bytes = hex::decode(key).map_err(|e| WalletError::InvalidKey(e.to_string()))?;

    match bytes.len() {
        32 => Ok(to_array(&bytes)),
        33 if bytes[32] == COMPRESSED_SUFFIX => Ok(to_array(&bytes[..32])),
        n => Err(WalletError::InvalidKey(format!(
            "expected 32 bytes of hex, got {}",
            n
        ))),
    }
}

fn parse_wif_key(key: &str) -> WalletResult<[u8; 32]> {
    let data = bs58::decode(key)
        .into_vec()
        .map_err(|e| WalletError::InvalidKey(format!("not hex or base58: {}", e)))?;

    if data.len() < 5 {
        return Err(WalletError::InvalidKey("WIF too short".to_string()));
    }

    let (payload, checksum) = data.split_at(data.len() - 4);
    if double_sha256(payload)[..4] != *checksum {
        return Err(WalletError::InvalidKey("WIF checksum mismatch".to_string()));
    }
    if payload[0] != WIF_VERSION {
        return Err(WalletError::InvalidKey(format!(
            "unexpected WIF version 0x{:02x}",
            payload[0]
        )));
    }

    match payload.len() {
        33 => Ok(to_array(&payload[1..])),
        34 if payload[33] == COMPRESSED_SUFFIX => Ok(to_array(&payload[1..33])),
        n => Err(WalletError::InvalidKey(format!(
            "unexpected WIF payload length {}",
            n
        ))),
    }
}

fn double_sha256(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    Sha256::digest(first).into()
}

fn to_array(bytes: &[u8]) -> [u8; 32] {
    let mut key = [0u8; 32];
    key.copy_from_slice(bytes);
    key
}

/// Derive the Ethereum address of a signing key.
///
/// Keccak-256 over the 64-byte uncompressed public key (marker byte
/// dropped), keeping the last 20 bytes.
pub fn derive_address(key: &SigningKey) -> Address {
    address_of(key.verifying_key())
}

/// Ethereum address of a public key.
pub fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

/// Render an address as lowercase hex with a `0x` prefix.
pub fn format_address(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}
