//! Dispatcher backed by the `cleos` command-line tool.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::chain::transaction::PermissionLevel;
use crate::dispatch::{DispatchError, DispatchResult, TransactionDispatcher};

/// Environment variable holding the key `cleos sign` applies.
pub const SIGNING_KEY_ENV_VAR: &str = "EOS_SIGNING_KEY";

/// Runs `cleos` against a node.
#[derive(Clone)]
pub struct CleosDispatcher {
    binary: String,
    node_url: String,
    signing_key: Option<String>,
}

impl CleosDispatcher {
    pub fn new(binary: impl Into<String>, node_url: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            node_url: node_url.into(),
            signing_key: None,
        }
    }

    /// Key passed to `cleos sign -k`.
    pub fn with_signing_key(mut self, key: impl Into<String>) -> Self {
        self.signing_key = Some(key.into());
        self
    }

    /// Read the signing key from `EOS_SIGNING_KEY`, if set.
    pub fn with_signing_key_from_env(self) -> Self {
        match std::env::var(SIGNING_KEY_ENV_VAR) {
            Ok(key) if !key.trim().is_empty() => self.with_signing_key(key.trim()),
            _ => self,
        }
    }

    pub fn has_signing_key(&self) -> bool {
        self.signing_key.is_some()
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-u")
            .arg(&self.node_url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    async fn run(&self, mut cmd: Command, operation: &'static str) -> DispatchResult<String> {
        let output = cmd.output().await.map_err(|source| DispatchError::Spawn {
            binary: self.binary.clone(),
            source,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::debug!(
                binary = %self.binary,
                operation = operation,
                status = ?output.status.code(),
                "External command failed"
            );
            return Err(DispatchError::Failed {
                binary: self.binary.clone(),
                status: output.status.code(),
                stderr,
            });
        }

        tracing::debug!(binary = %self.binary, operation = operation, "External command succeeded");
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl TransactionDispatcher for CleosDispatcher {
    async fn sign_transaction(&self, tx_file: &Path) -> DispatchResult<String> {
        let key = self
            .signing_key
            .as_deref()
            .ok_or(DispatchError::MissingSigningKey(SIGNING_KEY_ENV_VAR))?;

        tracing::info!(binary = %self.binary, tx_file = %tx_file.display(), "Signing transaction");

        let mut cmd = self.command();
        cmd.args(["sign", "-p", "-k", key]).arg(tx_file);
        self.run(cmd, "sign").await
    }

    async fn push_action(
        &self,
        contract: &str,
        action: &str,
        data_file: &Path,
        authorization: &PermissionLevel,
    ) -> DispatchResult<String> {
        tracing::info!(
            binary = %self.binary,
            contract = contract,
            action = action,
            authorization = %authorization,
            "Pushing action"
        );

        let mut cmd = self.command();
        cmd.args(["push", "action", contract, action])
            .arg(data_file)
            .arg("-p")
            .arg(authorization.to_string());
        self.run(cmd, "push action").await
    }
}

impl std::fmt::Debug for CleosDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleosDispatcher")
            .field("binary", &self.binary)
            .field("node_url", &self.node_url)
            .field("has_signing_key", &self.signing_key.is_some())
            .finish()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn pusher() -> PermissionLevel {
        PermissionLevel::parse("pusher", "active").unwrap()
    }

    #[tokio::test]
    async fn test_sign_arguments() {
        let dispatcher = CleosDispatcher::new("echo", "http://127.0.0.1:8888").with_signing_key("5KEY");
        let output = dispatcher
            .sign_transaction(Path::new("/tmp/claim-tx.json"))
            .await
            .unwrap();

        assert_eq!(
            output.trim(),
            "-u http://127.0.0.1:8888 sign -p -k 5KEY /tmp/claim-tx.json"
        );
    }

    #[tokio::test]
    async fn test_push_arguments() {
        let dispatcher = CleosDispatcher::new("echo", "http://node:8888");
        let output = dispatcher
            .push_action("eosio.unregd", "regaccount", Path::new("/tmp/data.json"), &pusher())
            .await
            .unwrap();

        assert_eq!(
            output.trim(),
            "-u http://node:8888 push action eosio.unregd regaccount /tmp/data.json -p pusher@active"
        );
    }

    #[tokio::test]
    async fn test_non_zero_exit() {
        let dispatcher = CleosDispatcher::new("false", "http://127.0.0.1:8888");
        let err = dispatcher
            .push_action("eosio.unregd", "regaccount", Path::new("/tmp/data.json"), &pusher())
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::Failed { status: Some(1), .. }));
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let dispatcher = CleosDispatcher::new("/nonexistent/cleos", "http://127.0.0.1:8888");
        let err = dispatcher
            .push_action("eosio.unregd", "regaccount", Path::new("/tmp/data.json"), &pusher())
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_sign_requires_key() {
        let dispatcher = CleosDispatcher::new("echo", "http://127.0.0.1:8888");
        let err = dispatcher
            .sign_transaction(Path::new("/tmp/claim-tx.json"))
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::MissingSigningKey(SIGNING_KEY_ENV_VAR)));
    }

    #[test]
    fn test_debug_hides_key() {
        let dispatcher = CleosDispatcher::new("cleos", "http://127.0.0.1:8888").with_signing_key("5SECRET");
        assert!(!format!("{:?}", dispatcher).contains("5SECRET"));
    }
}
