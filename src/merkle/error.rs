//! Engine errors.

use thiserror::Error;

use crate::core::encoding::EncodingError;

/// Failures of the offline build phase.
///
/// Verification never produces one of these; a rejected proof is `false`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MerkleError {
    /// Identifier or account has the wrong shape.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(#[from] EncodingError),

    /// No leaves to build from.
    #[error("cannot build a merkle tree from zero leaves")]
    EmptyTree,

    /// Proof requested for a leaf that does not exist.
    #[error("leaf index {index} out of range for tree with {leaf_count} leaves")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Leaves in the tree.
        leaf_count: usize,
    },
}
