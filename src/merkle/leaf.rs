//! Leaf Encoding
//!
//! `leaf = keccak256(uint256 identifier ++ address account)`, packed tight:
//! 32 big-endian bytes followed by the 20 raw address bytes, 52 bytes in
//! total. This is `abi.encodePacked(uint256, address)`, so it must match
//! the consuming contract byte for byte. Padding the address to 32 bytes
//! or swapping the fields produces leaves no proof will ever verify.

use crate::core::hash::{Leaf, PackedHasher};
use crate::core::types::{Address, TokenId};
use super::error::MerkleError;

/// Size of the packed leaf preimage.
pub const LEAF_PREIMAGE_LEN: usize = 32 + 20;

/// Encode a typed entry into its leaf hash.
pub fn encode_leaf(identifier: &TokenId, account: &Address) -> Leaf {
    let mut hasher = PackedHasher::new();
    hasher.update_word(identifier.as_bytes());
    hasher.update_bytes(account.as_bytes());
    hasher.finalize()
}

/// Encode raw big-endian identifier bytes and raw account bytes.
///
/// The identifier may be shorter than 32 bytes (it is left-padded) but not
/// wider; the account must be exactly 20 bytes. Anything else is
/// [`MerkleError::InvalidEncoding`].
pub fn encode_leaf_bytes(identifier: &[u8], account: &[u8]) -> Result<Leaf, MerkleError> {
    let identifier = TokenId::from_be_slice(identifier)?;
    let account = Address::from_slice(account)?;
    Ok(encode_leaf(&identifier, &account))
}

/// The 52-byte preimage hashed by [`encode_leaf`].
pub fn leaf_preimage(identifier: &TokenId, account: &Address) -> [u8; LEAF_PREIMAGE_LEN] {
    let mut preimage = [0u8; LEAF_PREIMAGE_LEN];
    preimage[..32].copy_from_slice(identifier.as_bytes());
    preimage[32..].copy_from_slice(account.as_bytes());
    preimage
}
