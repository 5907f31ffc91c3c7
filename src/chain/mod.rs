//! Chain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Node endpoint (config / API_URL)
//!     → client.rs (get_info, abi_json_to_bin with timeouts)
//!     → tapos.rs (ref_block_num / ref_block_prefix from block id)
//!     → transaction.rs (claim args, envelope, expiration)
//!
//! Private key (argument, stdin, env)
//!     → wallet.rs (hex/WIF parsing, address derivation)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - All node calls have configurable timeouts

pub mod client;
pub mod tapos;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::NodeClient;
pub use tapos::{extract_tapos, BlockId, Tapos};
pub use transaction::{Action, ClaimArgs, PayloadError, PermissionLevel, Transaction};
pub use types::{ChainError, ChainInfo, ChainResult};
pub use wallet::{derive_address, format_address, Wallet, WalletError};
