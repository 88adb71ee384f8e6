//! Proof Distribution
//!
//! The artifact an operator publishes after the offline build: the root for
//! the consuming contract, and for every entry the proof its account needs
//! to claim. Rendered as JSON with `0x` hex hashes.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{LeafOrder, OddNodePolicy, TreeConfig};
use crate::core::encoding::{hex32, hex32_vec, to_hex};
use crate::core::hash::{Hash32, Leaf, Root};
use crate::core::types::{Address, TokenId};
use crate::merkle::{verify, MerkleError};
use super::entry::Whitelist;

/// Proof book I/O errors.
#[derive(Debug, Error)]
pub enum DistributionError {
    /// Building the tree or a proof failed.
    #[error(transparent)]
    Merkle(#[from] MerkleError),

    /// File I/O failed.
    #[error("proof book I/O: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed proof book JSON.
    #[error("invalid proof book JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Proof for one whitelist entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofRecord {
    /// Entry identifier.
    pub identifier: TokenId,
    /// Entry account.
    pub account: Address,
    /// Leaf hash of the entry.
    #[serde(with = "hex32")]
    pub leaf: Leaf,
    /// Sibling path, leaf to root.
    #[serde(with = "hex32_vec")]
    pub proof: Vec<Hash32>,
}

impl ProofRecord {
    /// Check this record against a root.
    pub fn verify(&self, root: &Root) -> bool {
        verify(&self.leaf, &self.proof, root)
    }
}

/// Root plus one proof per entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofBook {
    /// Root to publish.
    #[serde(with = "hex32")]
    pub root: Root,
    /// Number of leaves committed.
    pub leaf_count: usize,
    /// Odd node policy the tree was built with.
    pub odd_nodes: OddNodePolicy,
    /// Leaf order the tree was built with.
    pub leaf_order: LeafOrder,
    /// Proofs in whitelist order.
    pub entries: Vec<ProofRecord>,
}

impl ProofBook {
    /// Build the tree for `whitelist` and a proof for every entry.
    pub fn generate(whitelist: &Whitelist, config: TreeConfig) -> Result<Self, DistributionError> {
        let tree = whitelist.tree(config)?;

        let entries = whitelist
            .entries()
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let proof = tree.prove_for(index)?;
                Ok::<_, MerkleError>(ProofRecord {
                    identifier: entry.identifier,
                    account: entry.account,
                    leaf: entry.leaf(),
                    proof: proof.siblings,
                })
            })
            .collect::<Result<Vec<_>, MerkleError>>()?;

        info!(
            "Generated proofs for {} entries, root {}",
            entries.len(),
            to_hex(tree.root())
        );

        Ok(Self {
            root: tree.root(),
            leaf_count: tree.leaf_count(),
            odd_nodes: config.odd_nodes,
            leaf_order: config.leaf_order,
            entries,
        })
    }

    /// Look up the record for an entry.
    pub fn find(&self, identifier: &TokenId, account: &Address) -> Option<&ProofRecord> {
        self.entries
            .iter()
            .find(|r| r.identifier == *identifier && r.account == *account)
    }

    /// All records for one account.
    pub fn for_account<'a>(
        &'a self,
        account: &'a Address,
    ) -> impl Iterator<Item = &'a ProofRecord> {
        self.entries.iter().filter(move |r| r.account == *account)
    }

    /// Root as `0x` hex, the form handed to the root setter.
    pub fn root_hex(&self) -> String {
        to_hex(self.root)
    }

    /// Pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, DistributionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, DistributionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write to `path` through a temp file and rename.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DistributionError> {
        let path = path.as_ref();
        let json = self.to_json_pretty()?;

        let temp_path = path.with_extension("tmp");
        let mut file = File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
        fs::rename(&temp_path, path)?;

        debug!("Wrote proof book to {:?}", path);
        Ok(())
    }

    /// Read from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DistributionError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::whitelist::entry::Entry;

    fn whitelist(n: u64) -> Whitelist {
        let entries = (0..n)
            .map(|i| {
                let mut account = [0u8; 20];
                account[12..].copy_from_slice(&(i + 1).to_be_bytes());
                Entry::new(TokenId::from(i), Address::new(account))
            })
            .collect();
        Whitelist::from_entries(entries).unwrap()
    }

    #[test]
    fn test_generate_covers_every_entry() {
        let book = ProofBook::generate(&whitelist(5), TreeConfig::default()).unwrap();
        assert_eq!(book.leaf_count, 5);
        assert_eq!(book.entries.len(), 5);
        for record in &book.entries {
            assert!(record.verify(&book.root));
        }
    }

    #[test]
    fn test_generate_empty_whitelist_fails() {
        let err = ProofBook::generate(&Whitelist::default(), TreeConfig::default()).unwrap_err();
        assert!(matches!(err, DistributionError::Merkle(MerkleError::EmptyTree)));
    }

    #[test]
    fn test_find() {
        let list = whitelist(4);
        let book = ProofBook::generate(&list, TreeConfig::default()).unwrap();
        let entry = list.entries()[2];

        let record = book.find(&entry.identifier, &entry.account).unwrap();
        assert_eq!(record.leaf, entry.leaf());
        assert!(book.find(&TokenId::from(99u64), &entry.account).is_none());
        assert_eq!(book.for_account(&entry.account).count(), 1);
    }

    #[test]
    fn test_json_format() {
        let book = ProofBook::generate(&whitelist(3), TreeConfig::default()).unwrap();
        let json = book.to_json_pretty().unwrap();

        assert!(json.contains(&format!("\"root\": \"{}\"", book.root_hex())));
        assert!(json.contains("\"odd_nodes\": \"carry-up\""));
        assert!(json.contains("\"leaf_order\": \"sorted\""));
        assert_eq!(ProofBook::from_json_str(&json).unwrap(), book);
    }

    #[test]
    fn test_save_and_load() {
        let book = ProofBook::generate(&whitelist(6), TreeConfig::default()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proofs.json");

        book.save(&path).unwrap();
        let loaded = ProofBook::load(&path).unwrap();

        assert_eq!(loaded, book);
        assert!(!path.with_extension("tmp").exists());
    }
}
