//! Claim workflow: fetch → derive → sign → submit.
//!
//! # Data Flow
//! ```text
//! ClaimRequest (account, EOS public key, authorization)
//!     → NodeClient::get_info         (last irreversible block id)
//!     → extract_tapos                (ref_block_num, ref_block_prefix)
//!     → MessageSigner::sign_claim    (canonical signature)
//!     → ClaimArgs
//!         push: temp data file → TransactionDispatcher::push_action
//!         sign: abi_json_to_bin → Transaction → temp file
//!               → TransactionDispatcher::sign_transaction → persisted file
//! ```
//!
//! Temp files are removed on every path except a successfully signed
//! transaction, whose file is kept and returned to the caller.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::chain::tapos::{extract_tapos, Tapos};
use crate::chain::transaction::{
    expiration_from, validate_account, validate_public_key, Action, ClaimArgs, PayloadError,
    PermissionLevel, Transaction,
};
use crate::chain::types::ChainError;
use crate::chain::wallet::WalletError;
use crate::chain::NodeClient;
use crate::config::{ConfigError, TransactionConfig};
use crate::dispatch::{DispatchError, TransactionDispatcher};
use crate::signing::{MessageSigner, SignedClaim, SigningError};

/// Any failure of a claim run.
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("Temp file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for claim operations.
pub type ClaimResult<T> = Result<T, ClaimError>;

/// What is being claimed and who pushes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimRequest {
    pub account: String,
    pub eos_pubkey: String,
    pub authorization: PermissionLevel,
}

impl ClaimRequest {
    /// Validate command-line input into a request.
    pub fn new(
        account: &str,
        eos_pubkey: &str,
        actor: &str,
        default_permission: &str,
    ) -> ClaimResult<Self> {
        validate_account(account)?;
        validate_public_key(eos_pubkey)?;
        let authorization = PermissionLevel::parse(actor, default_permission)?;

        Ok(Self {
            account: account.to_string(),
            eos_pubkey: eos_pubkey.to_string(),
            authorization,
        })
    }
}

/// A signed claim ready to be submitted.
#[derive(Debug, Clone)]
pub struct PreparedClaim {
    pub tapos: Tapos,
    pub signed: SignedClaim,
    pub args: ClaimArgs,
}

/// Runs claims against a node through an injected dispatcher.
pub struct ClaimService {
    client: NodeClient,
    signer: MessageSigner,
    dispatcher: Arc<dyn TransactionDispatcher>,
    config: TransactionConfig,
}

impl ClaimService {
    pub fn new(
        client: NodeClient,
        signer: MessageSigner,
        dispatcher: Arc<dyn TransactionDispatcher>,
        config: TransactionConfig,
    ) -> Self {
        Self {
            client,
            signer,
            dispatcher,
            config,
        }
    }

    /// Fetch the reference block and sign the claim message.
    pub async fn prepare(&self, request: &ClaimRequest) -> ClaimResult<PreparedClaim> {
        let info = self.client.get_info().await?;
        let tapos = extract_tapos(&info.last_irreversible_block_id)?;

        tracing::info!(
            ref_block_num = tapos.ref_block_num,
            ref_block_prefix = tapos.ref_block_prefix,
            "Derived reference block"
        );

        let signed = self
            .signer
            .sign_claim(&tapos, &request.eos_pubkey, &request.account)
            .await?;

        let args = ClaimArgs {
            signature: signed.signature.to_hex(),
            account: request.account.clone(),
            eos_pubkey: request.eos_pubkey.clone(),
        };

        Ok(PreparedClaim {
            tapos,
            signed,
            args,
        })
    }

    /// Push the claim action directly.
    ///
    /// Returns the dispatcher's confirmation output.
    pub async fn push(&self, request: &ClaimRequest) -> ClaimResult<String> {
        let prepared = self.prepare(request).await?;
        let data_file = write_json_temp(&prepared.args)?;

        let output = self
            .dispatcher
            .push_action(
                &self.config.contract,
                &self.config.action,
                data_file.path(),
                &request.authorization,
            )
            .await?;

        tracing::info!(account = %request.account, "Claim pushed");
        Ok(output)
    }

    /// Build the full transaction, have the dispatcher sign it, and keep
    /// the signed result on disk.
    ///
    /// Returns the path of the signed transaction file.
    pub async fn sign_transaction(&self, request: &ClaimRequest) -> ClaimResult<PathBuf> {
        let prepared = self.prepare(request).await?;
        let binargs = self
            .client
            .abi_json_to_bin(&self.config.contract, &self.config.action, &prepared.args)
            .await?;

        let transaction = self.build_transaction(prepared.tapos, binargs, &request.authorization);
        let tx_file = write_json_temp(&transaction)?;

        let signed = self.dispatcher.sign_transaction(tx_file.path()).await?;
        std::fs::write(tx_file.path(), signed.as_bytes())?;

        let (_, path) = tx_file.keep().map_err(|e| e.error)?;
        tracing::info!(path = %path.display(), expiration = %transaction.expiration, "Signed transaction written");

        Ok(path)
    }

    /// Envelope carrying the claim action.
    pub fn build_transaction(
        &self,
        tapos: Tapos,
        binargs: String,
        authorization: &PermissionLevel,
    ) -> Transaction {
        let action = Action {
            account: self.config.contract.clone(),
            name: self.config.action.clone(),
            authorization: vec![authorization.clone()],
            data: binargs,
        };

        Transaction::new(
            tapos,
            expiration_from(Utc::now(), self.config.expiration_secs),
            action,
        )
    }
}

/// Serialize `value` into a fresh temp file that is deleted on drop.
fn write_json_temp<T: Serialize>(value: &T) -> ClaimResult<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("unregd-claim-")
        .suffix(".json")
        .tempfile()?;

    serde_json::to_writer_pretty(file.as_file_mut(), value)?;
    file.flush()?;

    Ok(file)
}
