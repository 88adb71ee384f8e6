//! Merkle Commitment Engine
//!
//! Commits a whitelist to one 32-byte root and proves membership of single
//! entries against it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    COMMITMENT ENGINE                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  leaf.rs    - (identifier, account) -> keccak256 leaf       │
//! │  tree.rs    - Layered sorted-pair tree and root             │
//! │  proof.rs   - Sibling path for one leaf                     │
//! │  verify.rs  - Recompute root from leaf + path               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Building and proving run offline; only `verify` runs at claim time.

pub mod error;
pub mod leaf;
pub mod proof;
pub mod tree;
pub mod verify;

// Re-export key types
pub use error::MerkleError;
pub use leaf::{encode_leaf, encode_leaf_bytes, leaf_preimage};
pub use proof::{prove_for, MerkleProof};
pub use tree::{build_tree, MerkleTree};
pub use verify::{compute_root, verify};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LeafOrder, OddNodePolicy, TreeConfig};
    use crate::core::hash::Leaf;
    use proptest::prelude::*;

    fn configs() -> [TreeConfig; 4] {
        [
            TreeConfig::default(),
            TreeConfig::default().with_odd_nodes(OddNodePolicy::Duplicate),
            TreeConfig::default().with_leaf_order(LeafOrder::AsGiven),
            TreeConfig::default()
                .with_leaf_order(LeafOrder::AsGiven)
                .with_odd_nodes(OddNodePolicy::Duplicate),
        ]
    }

    fn leaf_sets() -> impl Strategy<Value = Vec<Leaf>> {
        prop::collection::vec(any::<[u8; 32]>(), 1..48)
    }

    proptest! {
        #[test]
        fn prop_every_member_verifies(leaves in leaf_sets()) {
            for config in configs() {
                let tree = MerkleTree::build_with(&leaves, config).unwrap();
                let root = tree.root();
                for (i, leaf) in leaves.iter().enumerate() {
                    let proof = prove_for(&tree, i).unwrap();
                    prop_assert!(verify(leaf, &proof.siblings, &root));
                }
            }
        }

        #[test]
        fn prop_sorted_root_ignores_input_order(
            (leaves, shuffled) in leaf_sets()
                .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
        ) {
            for odd_nodes in [OddNodePolicy::CarryUp, OddNodePolicy::Duplicate] {
                let config = TreeConfig::default().with_odd_nodes(odd_nodes);
                let a = MerkleTree::build_with(&leaves, config).unwrap();
                let b = MerkleTree::build_with(&shuffled, config).unwrap();
                prop_assert_eq!(a.root(), b.root());
            }
        }

        #[test]
        fn prop_proof_length_bounded_by_depth(leaves in leaf_sets()) {
            let n = leaves.len();
            let depth = (usize::BITS - (n - 1).leading_zeros()) as usize;

            let carry = MerkleTree::build(&leaves).unwrap();
            let dup = MerkleTree::build_with(
                &leaves,
                TreeConfig::default().with_odd_nodes(OddNodePolicy::Duplicate),
            ).unwrap();

            for i in 0..n {
                prop_assert!(carry.prove_for(i).unwrap().len() <= depth);
                prop_assert_eq!(dup.prove_for(i).unwrap().len(), depth);
            }
        }

        #[test]
        fn prop_foreign_proof_rejected(leaves in prop::collection::vec(any::<[u8; 32]>(), 2..48)) {
            let tree = MerkleTree::build(&leaves).unwrap();
            let root = tree.root();
            let proof_a = tree.prove_for(0).unwrap();
            let b = leaves[leaves.len() - 1];
            prop_assume!(b != leaves[0]);
            prop_assert!(!verify(&b, &proof_a.siblings, &root));
        }
    }
}
