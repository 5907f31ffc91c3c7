//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, apply API_URL override)
//!     → validation.rs (semantic checks)
//!     → ClaimConfig (validated, immutable)
//!     → handed to the node client, signer and dispatcher
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so the tool runs without a config file
//! - Validation separates syntactic (serde) from semantic checks
//! - CLI flags are applied by the binary after loading

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load, load_config, ConfigError, API_URL_ENV_VAR};
pub use schema::ClaimConfig;
pub use schema::{CleosConfig, NodeConfig, SigningConfig, TransactionConfig};
