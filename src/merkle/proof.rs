//! Proof Generation
//!
//! Walks from a leaf to the root collecting one sibling per layer. Siblings
//! are ordered leaf to root and carry no left/right flag; sorted-pair
//! hashing makes position irrelevant.

use serde::{Deserialize, Serialize};

use crate::config::OddNodePolicy;
use crate::core::encoding::{hex32_vec, to_hex};
use crate::core::hash::{Hash32, Leaf, Root};
use super::error::MerkleError;
use super::tree::MerkleTree;
use super::verify::verify;

/// Merkle inclusion proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// Index of the leaf in the input sequence.
    pub leaf_index: usize,
    /// Sibling hashes along the path, leaf to root.
    #[serde(with = "hex32_vec")]
    pub siblings: Vec<Hash32>,
}

impl MerkleProof {
    /// Number of sibling hashes.
    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    /// True for the proof of a single-leaf tree.
    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }

    /// Check this proof for `leaf` against `root`.
    pub fn verify(&self, leaf: &Leaf, root: &Root) -> bool {
        verify(leaf, &self.siblings, root)
    }

    /// Siblings as `0x` hex strings, the form handed to claimants.
    pub fn to_hex_strings(&self) -> Vec<String> {
        self.siblings.iter().map(to_hex).collect()
    }
}

impl MerkleTree {
    /// Generate the inclusion proof for the leaf at `leaf_index` in the
    /// input sequence.
    pub fn prove_for(&self, leaf_index: usize) -> Result<MerkleProof, MerkleError> {
        let mut current = self
            .position(leaf_index)
            .ok_or(MerkleError::IndexOutOfRange {
                index: leaf_index,
                leaf_count: self.leaf_count(),
            })?;

        let layers = self.layers();
        let mut siblings = Vec::with_capacity(self.depth());

        // Walk up the tree, the root layer has no sibling
        for layer in &layers[..layers.len() - 1] {
            let sibling = current ^ 1;
            if sibling < layer.len() {
                siblings.push(layer[sibling]);
            } else if self.config().odd_nodes == OddNodePolicy::Duplicate {
                siblings.push(layer[current]);
            }
            current /= 2;
        }

        Ok(MerkleProof {
            leaf_index,
            siblings,
        })
    }
}

/// Convenience wrapper for [`MerkleTree::prove_for`].
pub fn prove_for(tree: &MerkleTree, leaf_index: usize) -> Result<MerkleProof, MerkleError> {
    tree.prove_for(leaf_index)
}
