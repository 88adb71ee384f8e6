//! Tree Configuration
//!
//! Two compatibility-sensitive choices shape a tree: what happens to an
//! unpaired node at the end of a layer, and whether leaves are sorted
//! before building. A root and its proofs are only consistent when both
//! are fixed for the whole campaign.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable selecting [`OddNodePolicy`].
pub const ENV_ODD_NODES: &str = "MERKLE_ODD_NODES";

/// Environment variable selecting [`LeafOrder`].
pub const ENV_LEAF_ORDER: &str = "MERKLE_LEAF_ORDER";

/// Handling of the last node of an odd-length layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OddNodePolicy {
    /// Carry the unpaired node to the next layer unchanged.
    #[default]
    CarryUp,
    /// Pair the unpaired node with itself.
    Duplicate,
}

/// Order of leaves in layer 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LeafOrder {
    /// Sort leaves bytewise; the root depends only on the leaf multiset.
    #[default]
    Sorted,
    /// Keep input order; the root depends on the order of entries.
    AsGiven,
}

/// Unrecognized policy name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParsePolicyError {
    kind: &'static str,
    value: String,
}

impl FromStr for OddNodePolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "carry-up" | "carry" => Ok(Self::CarryUp),
            "duplicate" | "dup" => Ok(Self::Duplicate),
            other => Err(ParsePolicyError {
                kind: "odd node policy",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for OddNodePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CarryUp => f.write_str("carry-up"),
            Self::Duplicate => f.write_str("duplicate"),
        }
    }
}

impl FromStr for LeafOrder {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sorted" => Ok(Self::Sorted),
            "as-given" | "given" => Ok(Self::AsGiven),
            other => Err(ParsePolicyError {
                kind: "leaf order",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for LeafOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sorted => f.write_str("sorted"),
            Self::AsGiven => f.write_str("as-given"),
        }
    }
}

/// Tree construction configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Odd tail handling.
    pub odd_nodes: OddNodePolicy,
    /// Layer-0 ordering.
    pub leaf_order: LeafOrder,
}

impl TreeConfig {
    /// Create config from environment variables.
    ///
    /// Unset variables fall back to the defaults; set but unrecognized
    /// values are an error.
    pub fn from_env() -> Result<Self, ParsePolicyError> {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(ENV_ODD_NODES) {
            config.odd_nodes = value.parse()?;
        }
        if let Ok(value) = std::env::var(ENV_LEAF_ORDER) {
            config.leaf_order = value.parse()?;
        }
        Ok(config)
    }

    /// Set the odd node policy.
    pub fn with_odd_nodes(mut self, policy: OddNodePolicy) -> Self {
        self.odd_nodes = policy;
        self
    }

    /// Set the leaf order.
    pub fn with_leaf_order(mut self, order: LeafOrder) -> Self {
        self.leaf_order = order;
        self
    }
}
