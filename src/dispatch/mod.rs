//! Transaction signing and broadcast, delegated to an external tool.
//!
//! # Data Flow
//! ```text
//! claim workflow
//!     → TransactionDispatcher (trait seam)
//!         → cleos.rs (spawns `cleos sign` / `cleos push action`)
//!         → test doubles (record calls, no processes)
//! ```
//!
//! # Design Decisions
//! - The claim workflow only sees the trait, so it is testable without
//!   spawning processes
//! - A non-zero exit is an error carrying the exit status and stderr
//! - Network failures are not retried

pub mod cleos;

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::chain::transaction::PermissionLevel;

pub use cleos::{CleosDispatcher, SIGNING_KEY_ENV_VAR};

/// Errors raised by a dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The external tool could not be started.
    #[error("Failed to run {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    /// The external tool ran and reported failure.
    #[error("{binary} exited with status {}: {stderr}", fmt_status(.status))]
    Failed {
        binary: String,
        status: Option<i32>,
        stderr: String,
    },

    /// A transaction signing key is required but was not provided.
    #[error("No transaction signing key configured (set {0})")]
    MissingSigningKey(&'static str),
}

fn fmt_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "unknown (terminated by signal)".to_string(),
    }
}

/// Result type for dispatcher operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Capability to sign and broadcast claim transactions.
#[async_trait]
pub trait TransactionDispatcher: Send + Sync {
    /// Sign (and push) the transaction stored in `tx_file`.
    ///
    /// Returns the signed transaction as emitted by the tool.
    async fn sign_transaction(&self, tx_file: &Path) -> DispatchResult<String>;

    /// Push a single action whose JSON data is stored in `data_file`.
    ///
    /// Returns the tool's confirmation output.
    async fn push_action(
        &self,
        contract: &str,
        action: &str,
        data_file: &Path,
        authorization: &PermissionLevel,
    ) -> DispatchResult<String>;
}
