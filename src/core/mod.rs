//! Core primitives.
//!
//! Hashing, entry field types and hex encoding shared by the engine and the
//! whitelist tooling.

pub mod encoding;
pub mod hash;
pub mod types;

// Re-export core types
pub use encoding::{parse_hash32, to_hex, EncodingError};
pub use hash::{hash_sorted_pair, keccak256, Hash32, Leaf, PackedHasher, Root};
pub use types::{Address, TokenId};
