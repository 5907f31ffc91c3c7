//! TAPOS extraction from block identifiers.
//!
//! A block id is a 32-byte hash whose first 4 bytes carry the block number
//! big-endian. The reference prefix is the low 32-bit word of the
//! little-endian u64 stored at bytes 8..16.

use alloy::primitives::hex;
use serde::{Deserialize, Serialize};

use crate::chain::types::{ChainError, ChainResult};

/// Bytes the extractor reads (0..16). Full ids are 32 bytes, but truncated
/// ids are accepted as long as every byte used for TAPOS is present.
const MIN_BLOCK_ID_BYTES: usize = 16;

/// Reference block fields binding a transaction to a recent block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tapos {
    pub ref_block_num: u16,
    pub ref_block_prefix: u32,
}

/// A decoded block identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockId(Vec<u8>);

impl BlockId {
    /// Decode a hex block id, with or without a `0x` prefix.
    pub fn parse(id: &str) -> ChainResult<Self> {
        let invalid = |reason: String| ChainError::InvalidBlockId {
            id: id.to_string(),
            reason,
        };

        let bytes = hex::decode(id.trim()).map_err(|e| invalid(e.to_string()))?;
        if bytes.len() < MIN_BLOCK_ID_BYTES {
            return Err(invalid(format!(
                "expected at least {} bytes, got {}",
                MIN_BLOCK_ID_BYTES,
                bytes.len()
            )));
        }

        Ok(Self(bytes))
    }

    /// Block number encoded in the first word.
    pub fn block_num(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// Derive the TAPOS fields.
    pub fn tapos(&self) -> Tapos {
        let word = u64::from_le_bytes([
            self.0[8], self.0[9], self.0[10], self.0[11], self.0[12], self.0[13], self.0[14],
            self.0[15],
        ]);

        Tapos {
            ref_block_num: (self.block_num() & 0xffff) as u16,
            ref_block_prefix: word as u32,
        }
    }
}

/// Parse a hex block id and derive its TAPOS fields.
pub fn extract_tapos(block_id: &str) -> ChainResult<Tapos> {
    Ok(BlockId::parse(block_id)?.tapos())
}
