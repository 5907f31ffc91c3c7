//! Claim pre-allocated EOS accounts with an Ethereum key.

pub mod chain;
pub mod claim;
pub mod config;
pub mod dispatch;
pub mod observability;
pub mod signing;

pub use claim::{ClaimError, ClaimRequest, ClaimResult, ClaimService};
pub use config::ClaimConfig;
