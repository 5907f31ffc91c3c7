//! Claim signature encoding and the canonical-form predicate.

use alloy::primitives::{hex, Address, B256};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};

use crate::chain::wallet::address_of;
use crate::signing::{SigningError, SigningResult};

/// Marker byte prepended to the hex signature (secp256k1 key type).
pub const SCHEME_MARKER: u8 = 0x00;

/// Offset added to the recovery id in the `v` byte.
pub const RECOVERY_OFFSET: u8 = 27;

/// A recoverable secp256k1 signature laid out as `v‖r‖s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimSignature([u8; 65]);

impl ClaimSignature {
    /// Assemble from a recovery id and the 64-byte `r‖s` encoding.
    pub fn from_parts(recovery_id: u8, rs: &[u8; 64]) -> Self {
        let mut bytes = [0u8; 65];
        bytes[0] = RECOVERY_OFFSET + recovery_id;
        bytes[1..].copy_from_slice(rs);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; 65]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    /// Recoverability byte.
    pub fn v(&self) -> u8 {
        self.0[0]
    }

    pub fn r(&self) -> &[u8] {
        &self.0[1..33]
    }

    pub fn s(&self) -> &[u8] {
        &self.0[33..65]
    }

    pub fn is_canonical(&self) -> bool {
        is_canonical(&self.0)
    }

    /// Hex form submitted to the contract: scheme marker, then `v‖r‖s`.
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(132);
        out.push_str(&hex::encode([SCHEME_MARKER]));
        out.push_str(&hex::encode(self.0));
        out
    }

    /// Recover the address that produced this signature over `digest`.
    pub fn recover_address(&self, digest: &B256) -> SigningResult<Address> {
        let recovery_id = self
            .v()
            .checked_sub(RECOVERY_OFFSET)
            .and_then(RecoveryId::from_byte)
            .ok_or_else(|| SigningError::Recovery(format!("bad v byte {}", self.v())))?;

        let signature = Signature::from_slice(&self.0[1..])
            .map_err(|e| SigningError::Recovery(e.to_string()))?;

        let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &signature, recovery_id)
            .map_err(|e| SigningError::Recovery(e.to_string()))?;

        Ok(address_of(&key))
    }
}

impl std::fmt::Display for ClaimSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Whether a `v‖r‖s` signature avoids ambiguous high-bit patterns.
///
/// Neither `r` nor `s` may have its top bit set, and neither may start
/// with a zero byte unless the following byte has its top bit set.
pub fn is_canonical(c: &[u8; 65]) -> bool {
    c[1] & 0x80 == 0
        && !(c[1] == 0 && c[2] & 0x80 == 0)
        && c[33] & 0x80 == 0
        && !(c[33] == 0 && c[34] & 0x80 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig_with(r0: u8, r1: u8, s0: u8, s1: u8) -> [u8; 65] {
        let mut c = [0x11u8; 65];
        c[0] = 27;
        c[1] = r0;
        c[2] = r1;
        c[33] = s0;
        c[34] = s1;
        c
    }

    #[test]
    fn test_canonical_accepts_low_bits() {
        assert!(is_canonical(&sig_with(0x7f, 0x00, 0x12, 0xff)));
        // Leading zero is fine when the next byte needs it.
        assert!(is_canonical(&sig_with(0x00, 0x80, 0x00, 0x81)));
    }

    #[test]
    fn test_canonical_rejects_high_bits() {
        assert!(!is_canonical(&sig_with(0x80, 0x00, 0x12, 0x00)));
        assert!(!is_canonical(&sig_with(0x12, 0x00, 0xff, 0x00)));
    }

    #[test]
    fn test_canonical_rejects_needless_zero() {
        assert!(!is_canonical(&sig_with(0x00, 0x7f, 0x12, 0x00)));
        assert!(!is_canonical(&sig_with(0x12, 0x00, 0x00, 0x01)));
    }

    #[test]
    fn test_canonical_is_pure() {
        let c = sig_with(0x42, 0x00, 0x80, 0x00);
        let first = is_canonical(&c);
        for _ in 0..10 {
            assert_eq!(is_canonical(&c), first);
        }
    }

    #[test]
    fn test_hex_layout() {
        let mut rs = [0u8; 64];
        rs[0] = 0xaa;
        rs[32] = 0xbb;
        let sig = ClaimSignature::from_parts(1, &rs);

        let encoded = sig.to_hex();
        assert_eq!(encoded.len(), 132);
        assert!(encoded.starts_with("001caa"));
        assert_eq!(&encoded[68..70], "bb");
        assert_eq!(sig.v(), 28);
        assert_eq!(sig.r()[0], 0xaa);
        assert_eq!(sig.s()[0], 0xbb);
    }

    #[test]
    fn test_recover_rejects_bad_v() {
        let sig = ClaimSignature::from_bytes(sig_with(0x12, 0, 0x12, 0));
        let mut bad = *sig.as_bytes();
        bad[0] = 3;
        let err = ClaimSignature::from_bytes(bad)
            .recover_address(&B256::ZERO)
            .unwrap_err();
        assert!(err.to_string().contains("bad v byte"));
    }
}
