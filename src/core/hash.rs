//! Keccak-256 Hashing
//!
//! All hashes in the engine are Keccak-256, the hash the consuming
//! verifier on the EVM side computes. Provides:
//! - Plain hashing of byte strings
//! - Sorted-pair hashing for internal tree nodes
//! - An incremental hasher for multi-field preimages

use sha3::{Digest, Keccak256};

/// Hash output type (256 bits / 32 bytes)
pub type Hash32 = [u8; 32];

/// Hash of a single whitelist entry (tree level 0).
pub type Leaf = Hash32;

/// Top-level hash committing to the whole leaf set.
pub type Root = Hash32;

/// Incremental Keccak-256 hasher.
///
/// Fields are appended tightly, without length prefixes or padding, which
/// matches Solidity's `abi.encodePacked`. Order of updates is significant.
pub struct PackedHasher {
    hasher: Keccak256,
}

impl Default for PackedHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PackedHasher {
    /// Create an empty hasher.
    pub fn new() -> Self {
        Self {
            hasher: Keccak256::new(),
        }
    }

    /// Append raw bytes.
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Append a 32-byte word.
    #[inline]
    pub fn update_word(&mut self, word: &Hash32) {
        self.hasher.update(word);
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> Hash32 {
        self.hasher.finalize().into()
    }
}

/// Keccak-256 of arbitrary data.
pub fn keccak256(data: &[u8]) -> Hash32 {
    Keccak256::digest(data).into()
}

/// Hash two nodes in canonical order: `keccak256(min(a, b) ++ max(a, b))`.
///
/// The result does not depend on which node was the left child, so proofs
/// carry no position bits.
#[inline]
pub fn hash_sorted_pair(a: &Hash32, b: &Hash32) -> Hash32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut pair = [0u8; 64];
    pair[..32].copy_from_slice(lo);
    pair[32..].copy_from_slice(hi);
    keccak256(&pair)
}

// =============================================================================
// TESTS
// =============================================================================
