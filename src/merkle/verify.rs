//! Proof Verification
//!
//! The only engine function evaluated at claim time. Total and stateless:
//! a bad or empty proof is simply `false`. Costs one hash per sibling and
//! no allocation.

use crate::core::hash::{hash_sorted_pair, Hash32, Leaf, Root};

/// Recompute the root from `leaf` and `proof` and compare it to `root`.
pub fn verify(leaf: &Leaf, proof: &[Hash32], root: &Root) -> bool {
    compute_root(leaf, proof) == *root
}

/// Fold a proof into the root it implies.
pub fn compute_root(leaf: &Leaf, proof: &[Hash32]) -> Root {
    proof
        .iter()
        .fold(*leaf, |current, sibling| hash_sorted_pair(&current, sibling))
}
