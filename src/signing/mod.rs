//! Claim message signing subsystem.
//!
//! # Data Flow
//! ```text
//! Tapos + EOS public key + EOS account
//!     → scheme.rs (claim message, Plain/EthPersonal digest)
//!     → signer.rs (secp256k1 ECDSA, bounded canonical retry)
//!     → signature.rs (v‖r‖s encoding, canonical predicate, hex form)
//! ```
//!
//! # Design Decisions
//! - The hashing scheme is chosen by configuration, never implied
//! - Nonces are RFC 6979; retries mix the attempt number into the nonce,
//!   so a given key, message and attempt always yield the same bytes
//! - The canonical retry is bounded by `signing.max_attempts`

pub mod scheme;
pub mod signature;
pub mod signer;

use thiserror::Error;

pub use scheme::{claim_message, SigningScheme};
pub use signature::{is_canonical, ClaimSignature};
pub use signer::{MessageSigner, SignedClaim};

/// Errors raised while signing claim messages.
#[derive(Debug, Error)]
pub enum SigningError {
    /// The underlying ECDSA operation failed.
    #[error("ECDSA error: {0}")]
    Ecdsa(String),

    /// No canonical signature was produced within the attempt budget.
    #[error("No canonical signature after {attempts} attempts")]
    NonCanonical { attempts: u32 },

    /// Public key recovery from a signature failed.
    #[error("Signature recovery failed: {0}")]
    Recovery(String),
}

/// Result type for signing operations.
pub type SigningResult<T> = Result<T, SigningError>;
