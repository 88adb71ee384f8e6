//! # Whitelist Merkle
//!
//! Commits a fixed set of (identifier, account) pairs to a single 32-byte
//! Merkle root and proves membership of individual entries against it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    WHITELIST MERKLE                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Primitives                                │
//! │  ├── hash.rs     - Keccak-256, sorted-pair node hash         │
//! │  ├── types.rs    - TokenId (uint256), Address (20 bytes)     │
//! │  └── encoding.rs - 0x hex rendering and parsing              │
//! │                                                              │
//! │  merkle/         - Commitment engine (deterministic)         │
//! │  ├── leaf.rs     - Packed leaf encoding                      │
//! │  ├── tree.rs     - Layered tree construction                 │
//! │  ├── proof.rs    - Sibling path generation                   │
//! │  └── verify.rs   - Proof verification                        │
//! │                                                              │
//! │  whitelist/      - Setup tooling and consumer side           │
//! │  ├── entry.rs    - Typed, ordered whitelist                  │
//! │  ├── distribution.rs - Root + per-entry proof book           │
//! │  ├── registry.rs - Owner-gated published root                │
//! │  └── gate.rs     - Eligibility check, one claim per account  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Compatibility
//!
//! Leaves are `keccak256(abi.encodePacked(uint256 id, address account))`
//! and internal nodes hash their two children in sorted order, the scheme
//! OpenZeppelin's `MerkleProof.verify` checks on chain. Roots and proofs
//! built here verify there unchanged.
//!
//! ## Example
//!
//! ```
//! use whitelist_merkle::{encode_leaf, verify, Address, MerkleTree, TokenId};
//!
//! let entries: Vec<(TokenId, Address)> = (0..3u8)
//!     .map(|i| (TokenId::from(u64::from(i)), Address::new([i + 1; 20])))
//!     .collect();
//! let leaves: Vec<_> = entries.iter().map(|(id, a)| encode_leaf(id, a)).collect();
//!
//! let tree = MerkleTree::build(&leaves).unwrap();
//! let proof = tree.prove_for(0).unwrap();
//! assert!(verify(&leaves[0], &proof.siblings, &tree.root()));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod merkle;
pub mod whitelist;

// Re-export commonly used types
pub use config::{LeafOrder, OddNodePolicy, TreeConfig};
pub use crate::core::{Address, EncodingError, Hash32, Leaf, Root, TokenId};
pub use merkle::{
    build_tree, encode_leaf, encode_leaf_bytes, prove_for, verify, MerkleError, MerkleProof,
    MerkleTree,
};
pub use whitelist::{ClaimError, ClaimGate, Entry, ProofBook, RootRegistry, Whitelist};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
