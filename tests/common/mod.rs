//! Shared utilities for integration testing: a scripted chain node and a
//! recording dispatcher.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use unregd_claim::chain::PermissionLevel;
use unregd_claim::dispatch::{DispatchError, DispatchResult, TransactionDispatcher};

/// Last irreversible block id served by [`start_mock_node`] by default.
pub const TEST_BLOCK_ID: &str =
    "0000000affffffff785634120000000000000000000000000000000000000000";

/// Binary action data returned by the default `abi_json_to_bin` handler.
pub const TEST_BINARGS: &str = "00ab12cd";

// Well-known test private key (Anvil's first account)
pub const TEST_PRIVATE_KEY: &str =
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TEST_PUBKEY: &str = "EOS6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5GDW5CV";

/// A request received by the mock node.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

/// Start a programmable node on an ephemeral port.
///
/// `f` maps each request to a status code and body. Returns the bound
/// address and the log of received requests.
pub async fn start_programmable_node<F, Fut>(
    f: F,
) -> (SocketAddr, Arc<Mutex<Vec<RecordedRequest>>>)
where
    F: Fn(RecordedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let requests = log.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let f = f.clone();
                    let requests = requests.clone();
                    tokio::spawn(async move {
                        let mut reader = BufReader::new(socket);
                        let Some(request) = read_request(&mut reader).await else {
                            return;
                        };
                        requests.lock().unwrap().push(request.clone());

                        let (status, body) = f(request).await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let socket = reader.get_mut();
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, log)
}

/// Start a node that answers `get_info` with `block_id` and
/// `abi_json_to_bin` with [`TEST_BINARGS`].
pub async fn start_mock_node(
    block_id: &'static str,
) -> (SocketAddr, Arc<Mutex<Vec<RecordedRequest>>>) {
    start_programmable_node(move |request| async move {
        match request.path.as_str() {
            "/v1/chain/get_info" => (
                200,
                format!(
                    r#"{{"server_version":"mock","head_block_num":12,"last_irreversible_block_num":10,"last_irreversible_block_id":"{}"}}"#,
                    block_id
                ),
            ),
            "/v1/chain/abi_json_to_bin" => (200, format!(r#"{{"binargs":"{}"}}"#, TEST_BINARGS)),
            _ => (404, r#"{"error":"not found"}"#.to_string()),
        }
    })
    .await
}

async fn read_request<R: AsyncBufReadExt + Unpin>(reader: &mut R) -> Option<RecordedRequest> {
    let mut request_line = String::new();
    reader.read_line(&mut request_line).await.ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await.ok()? == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().ok()?;
            }
        }
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).await.ok()?;

    Some(RecordedRequest {
        method,
        path,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

/// A call seen by [`RecordingDispatcher`], with the file content captured
/// while the file still existed.
#[derive(Debug, Clone)]
pub enum DispatchCall {
    Sign {
        path: PathBuf,
        content: String,
    },
    Push {
        contract: String,
        action: String,
        path: PathBuf,
        content: String,
        authorization: String,
    },
}

/// Dispatcher double that records calls instead of spawning processes.
#[derive(Default)]
pub struct RecordingDispatcher {
    pub calls: Mutex<Vec<DispatchCall>>,
    /// When set, every call fails with this stderr.
    pub fail_with: Option<String>,
}

impl RecordingDispatcher {
    pub fn failing(stderr: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_with: Some(stderr.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<DispatchCall> {
        self.calls.lock().unwrap().clone()
    }

    fn outcome(&self, ok: String) -> DispatchResult<String> {
        match &self.fail_with {
            Some(stderr) => Err(DispatchError::Failed {
                binary: "recording".to_string(),
                status: Some(1),
                stderr: stderr.clone(),
            }),
            None => Ok(ok),
        }
    }
}

#[async_trait]
impl TransactionDispatcher for RecordingDispatcher {
    async fn sign_transaction(&self, tx_file: &Path) -> DispatchResult<String> {
        let content = std::fs::read_to_string(tx_file).unwrap();
        self.calls.lock().unwrap().push(DispatchCall::Sign {
            path: tx_file.to_path_buf(),
            content,
        });
        self.outcome(r#"{"signatures":["SIG_K1_mock"]}"#.to_string())
    }

    async fn push_action(
        &self,
        contract: &str,
        action: &str,
        data_file: &Path,
        authorization: &PermissionLevel,
    ) -> DispatchResult<String> {
        let content = std::fs::read_to_string(data_file).unwrap();
        self.calls.lock().unwrap().push(DispatchCall::Push {
            contract: contract.to_string(),
            action: action.to_string(),
            path: data_file.to_path_buf(),
            content,
            authorization: authorization.to_string(),
        });
        self.outcome("executed transaction: mock".to_string())
    }
}
