//! Merkle Tree Construction
//!
//! Binary Keccak-256 tree with sorted-pair internal nodes. Layers are kept
//! so proofs can be generated for any leaf after the build.
//!
//! ```text
//! layer 2:            root
//!                   /      \
//! layer 1:     H(a,b)       c        <- c carried up (odd tail)
//!              /   \        |
//! layer 0:    a     b       c
//! ```

use tracing::debug;

use crate::config::{LeafOrder, OddNodePolicy, TreeConfig};
use crate::core::encoding::to_hex;
use crate::core::hash::{hash_sorted_pair, Hash32, Leaf, Root};
use super::error::MerkleError;

/// Layers at least this long are hashed on the rayon pool.
#[cfg(feature = "parallel")]
const PARALLEL_THRESHOLD: usize = 1 << 12;

/// A built Merkle tree.
///
/// Leaves are addressed by their index in the input sequence, whatever
/// their position in layer 0.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    /// All tree layers (leaves at index 0, root at last index)
    layers: Vec<Vec<Hash32>>,
    /// Input index -> position in layer 0
    positions: Vec<usize>,
    config: TreeConfig,
}

impl MerkleTree {
    /// Build a tree with the default configuration.
    pub fn build(leaves: &[Leaf]) -> Result<Self, MerkleError> {
        Self::build_with(leaves, TreeConfig::default())
    }

    /// Build a tree from leaves in input order.
    pub fn build_with(leaves: &[Leaf], config: TreeConfig) -> Result<Self, MerkleError> {
        if leaves.is_empty() {
            return Err(MerkleError::EmptyTree);
        }

        let (base, positions) = arrange_leaves(leaves, config.leaf_order);

        let mut layers = vec![base];
        while let Some(current) = layers.last().filter(|layer| layer.len() > 1) {
            let next = next_layer(current, config.odd_nodes);
            layers.push(next);
        }

        let tree = Self {
            layers,
            positions,
            config,
        };

        debug!(
            "Built merkle tree: {} leaves, depth {}, root {}",
            tree.leaf_count(),
            tree.depth(),
            to_hex(tree.root())
        );

        Ok(tree)
    }

    /// The root hash.
    pub fn root(&self) -> Root {
        // build_with guarantees a non-empty top layer of length 1
        self.layers[self.layers.len() - 1][0]
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of layers above the leaves (`ceil(log2(leaf_count))`).
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// All layers, leaves first.
    pub fn layers(&self) -> &[Vec<Hash32>] {
        &self.layers
    }

    /// Configuration the tree was built with.
    pub fn config(&self) -> TreeConfig {
        self.config
    }

    /// Position in layer 0 of the leaf at `index` in the input sequence.
    pub fn position(&self, index: usize) -> Option<usize> {
        self.positions.get(index).copied()
    }

    /// Leaf at `index` in the input sequence.
    pub fn leaf(&self, index: usize) -> Option<Leaf> {
        self.position(index).map(|pos| self.layers[0][pos])
    }
}

/// Convenience wrapper for [`MerkleTree::build_with`].
pub fn build_tree(leaves: &[Leaf], config: TreeConfig) -> Result<MerkleTree, MerkleError> {
    MerkleTree::build_with(leaves, config)
}

/// Lay out layer 0 and record where each input leaf landed.
fn arrange_leaves(leaves: &[Leaf], order: LeafOrder) -> (Vec<Hash32>, Vec<usize>) {
    match order {
        LeafOrder::AsGiven => (leaves.to_vec(), (0..leaves.len()).collect()),
        LeafOrder::Sorted => {
            // Stable, so equal leaves keep their relative input order
            let mut order: Vec<usize> = (0..leaves.len()).collect();
            order.sort_by(|&a, &b| leaves[a].cmp(&leaves[b]));

            let mut positions = vec![0; leaves.len()];
            for (pos, &input) in order.iter().enumerate() {
                positions[input] = pos;
            }
            let base = order.iter().map(|&i| leaves[i]).collect();
            (base, positions)
        }
    }
}

/// Hash one layer into the next.
#[cfg(not(feature = "parallel"))]
fn next_layer(layer: &[Hash32], policy: OddNodePolicy) -> Vec<Hash32> {
    layer.chunks(2).map(|pair| parent_of(pair, policy)).collect()
}

/// Hash one layer into the next, pairs in parallel for large layers.
#[cfg(feature = "parallel")]
fn next_layer(layer: &[Hash32], policy: OddNodePolicy) -> Vec<Hash32> {
    use rayon::prelude::*;

    if layer.len() < PARALLEL_THRESHOLD {
        return layer.chunks(2).map(|pair| parent_of(pair, policy)).collect();
    }
    layer
        .par_chunks(2)
        .map(|pair| parent_of(pair, policy))
        .collect()
}

#[inline]
fn parent_of(pair: &[Hash32], policy: OddNodePolicy) -> Hash32 {
    match (pair, policy) {
        ([left, right], _) => hash_sorted_pair(left, right),
        (_, OddNodePolicy::CarryUp) => pair[0],
        (_, OddNodePolicy::Duplicate) => hash_sorted_pair(&pair[0], &pair[0]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaves(n: u8) -> Vec<Leaf> {
        (0..n).map(|i| [i.wrapping_mul(37).wrapping_add(1); 32]).collect()
    }

    #[test]
    fn test_empty_tree() {
        assert_eq!(MerkleTree::build(&[]).unwrap_err(), MerkleError::EmptyTree);
    }

    #[test]
    fn test_single_leaf_is_root() {
        let leaf = [5u8; 32];
        let tree = MerkleTree::build(&[leaf]).unwrap();
        assert_eq!(tree.root(), leaf);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.leaf_count(), 1);
    }

    #[test]
    fn test_two_leaves() {
        let a = [1u8; 32];
        let b = [2u8; 32];
        let tree = MerkleTree::build(&[b, a]).unwrap();
        assert_eq!(tree.root(), hash_sorted_pair(&a, &b));
    }

    #[test]
    fn test_layer_lengths_halve_rounding_up() {
        for n in 1..=33u8 {
            let tree = MerkleTree::build(&leaves(n)).unwrap();
            let layers = tree.layers();
            for k in 1..layers.len() {
                assert_eq!(layers[k].len(), layers[k - 1].len().div_ceil(2));
            }
            assert_eq!(layers.last().unwrap().len(), 1);
        }
    }

    #[test]
    fn test_depth_is_ceil_log2() {
        for n in 1..=33usize {
            let tree = MerkleTree::build(&leaves(n as u8)).unwrap();
            let expected = (usize::BITS - (n - 1).leading_zeros()) as usize;
            assert_eq!(tree.depth(), expected, "n = {}", n);
        }
    }

    #[test]
    fn test_odd_tail_carried_up() {
        let l = leaves(3);
        let config = TreeConfig::default().with_leaf_order(LeafOrder::AsGiven);
        let tree = MerkleTree::build_with(&l, config).unwrap();

        assert_eq!(tree.layers()[1][1], l[2]);
        assert_eq!(
            tree.root(),
            hash_sorted_pair(&hash_sorted_pair(&l[0], &l[1]), &l[2])
        );
    }

    #[test]
    fn test_odd_tail_duplicated() {
        let l = leaves(3);
        let config = TreeConfig::default()
            .with_leaf_order(LeafOrder::AsGiven)
            .with_odd_nodes(OddNodePolicy::Duplicate);
        let tree = MerkleTree::build_with(&l, config).unwrap();

        assert_eq!(tree.layers()[1][1], hash_sorted_pair(&l[2], &l[2]));
    }

    #[test]
    fn test_policies_give_different_roots() {
        let l = leaves(5);
        let carry = MerkleTree::build(&l).unwrap();
        let dup = MerkleTree::build_with(
            &l,
            TreeConfig::default().with_odd_nodes(OddNodePolicy::Duplicate),
        )
        .unwrap();
        assert_ne!(carry.root(), dup.root());
    }

    #[test]
    fn test_sorted_root_is_permutation_invariant() {
        let l = leaves(7);
        let mut reversed = l.clone();
        reversed.reverse();
        let mut rotated = l.clone();
        rotated.rotate_left(3);

        let root = MerkleTree::build(&l).unwrap().root();
        assert_eq!(MerkleTree::build(&reversed).unwrap().root(), root);
        assert_eq!(MerkleTree::build(&rotated).unwrap().root(), root);
    }

    #[test]
    fn test_as_given_root_depends_on_order() {
        let l = leaves(4);
        let mut swapped = l.clone();
        swapped.swap(1, 2);

        let config = TreeConfig::default().with_leaf_order(LeafOrder::AsGiven);
        let a = MerkleTree::build_with(&l, config).unwrap();
        let b = MerkleTree::build_with(&swapped, config).unwrap();
        assert_ne!(a.root(), b.root());
    }

    #[test]
    fn test_input_index_maps_to_leaf() {
        let l = leaves(6);
        let tree = MerkleTree::build(&l).unwrap();
        for (i, leaf) in l.iter().enumerate() {
            assert_eq!(tree.leaf(i), Some(*leaf));
        }
        assert_eq!(tree.leaf(6), None);
    }

    #[test]
    fn test_duplicate_leaves_are_kept() {
        let leaf = [9u8; 32];
        let tree = MerkleTree::build(&[leaf, leaf]).unwrap();
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.root(), hash_sorted_pair(&leaf, &leaf));
    }

    #[test]
    fn test_build_determinism() {
        let l = leaves(10);
        assert_eq!(
            MerkleTree::build(&l).unwrap().root(),
            build_tree(&l, TreeConfig::default()).unwrap().root()
        );
    }
}
