//! Chain node HTTP client with timeout and error handling.
//!
//! # Responsibilities
//! - Query chain head metadata (`get_info`)
//! - Serialize action arguments through the node's ABI (`abi_json_to_bin`)
//! - Bound every request with the configured timeout
//!
//! Requests are issued once. A failed call is reported to the caller and
//! never retried.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::time::timeout;

use crate::chain::types::{
    AbiJsonToBinRequest, AbiJsonToBinResponse, ChainError, ChainInfo, ChainResult,
};
use crate::config::NodeConfig;

const GET_INFO_PATH: &str = "/v1/chain/get_info";
const ABI_JSON_TO_BIN_PATH: &str = "/v1/chain/abi_json_to_bin";

/// HTTP client for a single chain node.
#[derive(Clone)]
pub struct NodeClient {
    http: reqwest::Client,
    base_url: String,
    timeout_duration: Duration,
}

impl NodeClient {
    /// Create a new node client.
    ///
    /// No request is made here; connectivity problems surface on first use.
    pub fn new(config: &NodeConfig) -> ChainResult<Self> {
        let base: url::Url = config.url.parse().map_err(|e| {
            ChainError::Rpc(format!("Invalid node URL '{}': {}", config.url, e))
        })?;

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ChainError::Rpc(format!("Failed to build HTTP client: {}", e)))?;

        tracing::debug!(node_url = %base, timeout_secs = config.timeout_secs, "Node client initialized");

        Ok(Self {
            http,
            base_url: base.as_str().trim_end_matches('/').to_string(),
            timeout_duration: Duration::from_secs(config.timeout_secs),
        })
    }

    /// Fetch chain head metadata.
    pub async fn get_info(&self) -> ChainResult<ChainInfo> {
        let request = self.http.get(self.endpoint(GET_INFO_PATH));
        let info: ChainInfo = self.execute("get_info", request).await?;

        tracing::info!(
            last_irreversible_block_id = %info.last_irreversible_block_id,
            last_irreversible_block_num = ?info.last_irreversible_block_num,
            head_block_num = ?info.head_block_num,
            "Fetched chain info"
        );

        Ok(info)
    }

    /// Serialize action arguments to their binary hex form.
    pub async fn abi_json_to_bin<T: Serialize>(
        &self,
        code: &str,
        action: &str,
        args: &T,
    ) -> ChainResult<String> {
        let body = AbiJsonToBinRequest { code, action, args };
        let request = self.http.post(self.endpoint(ABI_JSON_TO_BIN_PATH)).json(&body);
        let response: AbiJsonToBinResponse = self.execute("abi_json_to_bin", request).await?;

        tracing::debug!(code = code, action = action, bytes = response.binargs.len() / 2, "Action data serialized");

        Ok(response.binargs)
    }

    /// Base URL of the node.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute<R: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: reqwest::RequestBuilder,
    ) -> ChainResult<R> {
        let fut = async {
            let response = request
                .send()
                .await
                .map_err(|e| ChainError::Rpc(format!("{} request failed: {}", endpoint, e)))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| ChainError::Rpc(format!("{} body read failed: {}", endpoint, e)))?;

            if !status.is_success() {
                return Err(ChainError::Http {
                    endpoint,
                    status: status.as_u16(),
                    body,
                });
            }

            serde_json::from_str(&body).map_err(|e| ChainError::UnexpectedResponse {
                endpoint,
                reason: e.to_string(),
            })
        };

        match timeout(self.timeout_duration, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(endpoint = endpoint, "Node request timed out");
                Err(ChainError::Timeout(self.timeout_duration.as_secs()))
            }
        }
    }
}

impl std::fmt::Debug for NodeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeClient")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}
