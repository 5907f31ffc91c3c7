//! Claim message signer with bounded canonical-signature retry.
//!
//! # Responsibilities
//! - Build and hash the claim message with the configured scheme
//! - Produce recoverable secp256k1 signatures
//! - Re-sign after a delay until the signature is canonical, up to
//!   `max_attempts`

use std::time::Duration;

use alloy::primitives::B256;
use k256::ecdsa::hazmat::{bits2field, SignPrimitive};
use k256::Secp256k1;
use sha2::Sha256;

use crate::chain::tapos::Tapos;
use crate::chain::wallet::Wallet;
use crate::config::SigningConfig;
use crate::signing::scheme::{claim_message, SigningScheme};
use crate::signing::signature::ClaimSignature;
use crate::signing::{SigningError, SigningResult};

/// Outcome of signing a claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedClaim {
    /// The message that was hashed.
    pub message: String,
    /// Digest that was signed.
    pub digest: B256,
    /// Canonical signature over `digest`.
    pub signature: ClaimSignature,
    /// Number of signing attempts it took.
    pub attempts: u32,
}

/// Signs claim messages with an Ethereum key.
#[derive(Debug, Clone)]
pub struct MessageSigner {
    wallet: Wallet,
    scheme: SigningScheme,
    max_attempts: u32,
    retry_delay: Duration,
}

impl MessageSigner {
    /// Create a signer from a wallet and signing settings.
    pub fn new(wallet: Wallet, config: &SigningConfig) -> Self {
        Self {
            wallet,
            scheme: config.scheme,
            max_attempts: config.max_attempts.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    /// Build, hash and sign the claim message.
    pub async fn sign_claim(
        &self,
        tapos: &Tapos,
        eos_pubkey: &str,
        eos_account: &str,
    ) -> SigningResult<SignedClaim> {
        let message = claim_message(tapos, eos_pubkey, eos_account);
        let digest = self.scheme.digest(&message);

        let (signature, attempts) = self.sign_digest(&digest).await?;

        tracing::info!(
            scheme = ?self.scheme,
            signer = %self.wallet.address(),
            attempts = attempts,
            "Claim message signed"
        );

        Ok(SignedClaim {
            message,
            digest,
            signature,
            attempts,
        })
    }

    /// Sign `digest`, retrying until the signature is canonical.
    pub async fn sign_digest(&self, digest: &B256) -> SigningResult<(ClaimSignature, u32)> {
        retry_until_canonical(self.max_attempts, self.retry_delay, |attempt| {
            self.sign_attempt(digest, attempt)
        })
        .await
    }

    /// Produce the signature for one attempt.
    ///
    /// Attempt 0 is plain RFC 6979. Attempt `n` passes `n` as 32 big-endian
    /// bytes of RFC 6979 additional data, so each attempt has its own
    /// fixed signature.
    pub fn sign_attempt(&self, digest: &B256, attempt: u32) -> SigningResult<ClaimSignature> {
        let z = bits2field::<Secp256k1>(digest.as_slice())
            .map_err(|e| SigningError::Ecdsa(e.to_string()))?;
        let extra = nonce_data(attempt);
        let extra: &[u8] = match &extra {
            Some(data) => data,
            None => &[],
        };

        let (signature, recovery_id) = self
            .wallet
            .signing_key()
            .as_nonzero_scalar()
            .try_sign_prehashed_rfc6979::<Sha256>(&z, extra)
            .map_err(|e| SigningError::Ecdsa(e.to_string()))?;
        let recovery_id = recovery_id
            .ok_or_else(|| SigningError::Recovery("no recovery id produced".to_string()))?;

        let mut rs = [0u8; 64];
        rs.copy_from_slice(&signature.to_bytes());
        Ok(ClaimSignature::from_parts(recovery_id.to_byte(), &rs))
    }
}

/// RFC 6979 additional data for `attempt`; none for the first attempt.
fn nonce_data(attempt: u32) -> Option<[u8; 32]> {
    if attempt == 0 {
        return None;
    }
    let mut data = [0u8; 32];
    data[28..].copy_from_slice(&attempt.to_be_bytes());
    Some(data)
}

/// Call `sign` until it returns a canonical signature.
///
/// Sleeps `delay` before every attempt after the first. Returns the
/// signature with the number of attempts used, or
/// [`SigningError::NonCanonical`] once `max_attempts` is exhausted.
pub async fn retry_until_canonical<F>(
    max_attempts: u32,
    delay: Duration,
    mut sign: F,
) -> SigningResult<(ClaimSignature, u32)>
where
    F: FnMut(u32) -> SigningResult<ClaimSignature>,
{
    for attempt in 0..max_attempts {
        if attempt > 0 {
            tokio::time::sleep(delay).await;
        }

        let signature = sign(attempt)?;
        if signature.is_canonical() {
            return Ok((signature, attempt + 1));
        }

        tracing::debug!(attempt = attempt + 1, max_attempts = max_attempts, "Signature not canonical, re-signing");
    }

    tracing::warn!(max_attempts = max_attempts, "Gave up looking for a canonical signature");
    Err(SigningError::NonCanonical {
        attempts: max_attempts,
    })
}
