//! Whitelist Entries
//!
//! The operator's whitelist as an explicit ordered sequence of typed
//! records. An entry's index in this sequence is its leaf index.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::{Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use thiserror::Error;

use crate::config::TreeConfig;
use crate::core::encoding::EncodingError;
use crate::core::hash::Leaf;
use crate::core::types::{Address, TokenId};
use crate::merkle::{encode_leaf, MerkleError, MerkleTree};

/// One authorized (identifier, account) pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Entry {
    /// Identifier the account is entitled to.
    pub identifier: TokenId,
    /// Authorized account.
    pub account: Address,
}

impl Entry {
    /// Create an entry.
    pub fn new(identifier: TokenId, account: Address) -> Self {
        Self {
            identifier,
            account,
        }
    }

    /// Leaf hash of this entry.
    pub fn leaf(&self) -> Leaf {
        encode_leaf(&self.identifier, &self.account)
    }
}

/// Whitelist loading errors.
#[derive(Debug, Error)]
pub enum WhitelistError {
    /// Reading the file failed.
    #[error("failed to read whitelist: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid JSON, or neither a record array nor a map.
    #[error("invalid whitelist JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// One entry has the wrong JSON shape.
    #[error("malformed entry at index {index}: {source}")]
    MalformedEntry {
        /// Position in the file.
        index: usize,
        /// What was wrong.
        source: serde_json::Error,
    },

    /// A field of one entry is malformed.
    #[error("invalid entry at index {index}: {source}")]
    InvalidEntry {
        /// Position in the file.
        index: usize,
        /// What was wrong.
        source: EncodingError,
    },

    /// Same identifier and account listed twice.
    #[error("duplicate entry at index {index}: {identifier} -> {account}")]
    DuplicateEntry {
        /// Position of the second occurrence.
        index: usize,
        /// Repeated identifier.
        identifier: TokenId,
        /// Repeated account.
        account: Address,
    },

    /// Identifier key repeated in the map shape.
    #[error("duplicate identifier at index {index}: {identifier}")]
    DuplicateIdentifier {
        /// Position of the second occurrence.
        index: usize,
        /// Repeated identifier.
        identifier: TokenId,
    },
}

/// Accepted whitelist file shapes, entries still unparsed.
enum WhitelistFile<'a> {
    /// `[{"identifier": "…", "account": "0x…"}, …]`
    Records(Vec<&'a RawValue>),
    /// `{"<identifier>": "0x<account>", …}`, every key in file order
    Map(Vec<(String, &'a RawValue)>),
}

impl<'de> Deserialize<'de> for WhitelistFile<'de> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct WhitelistFileVisitor;

        impl<'de> Visitor<'de> for WhitelistFileVisitor {
            type Value = WhitelistFile<'de>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an array of entries or an identifier -> account map")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut records = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(raw) = seq.next_element()? {
                    records.push(raw);
                }
                Ok(WhitelistFile::Records(records))
            }

            // Walks the entries directly so repeated keys are seen, not merged
            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(pair) = map.next_entry::<String, &'de RawValue>()? {
                    pairs.push(pair);
                }
                Ok(WhitelistFile::Map(pairs))
            }
        }

        deserializer.deserialize_any(WhitelistFileVisitor)
    }
}

/// Record shape; the identifier is kept raw so integers wider than u64
/// keep their digits.
#[derive(Deserialize)]
struct Record<'a> {
    #[serde(borrow)]
    identifier: &'a RawValue,
    #[serde(borrow)]
    account: &'a RawValue,
}

/// Ordered, duplicate-free list of entries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Whitelist {
    entries: Vec<Entry>,
}

impl Whitelist {
    /// Create a whitelist, rejecting repeated entries.
    pub fn from_entries(entries: Vec<Entry>) -> Result<Self, WhitelistError> {
        let mut seen = BTreeSet::new();
        for (index, entry) in entries.iter().enumerate() {
            if !seen.insert(*entry) {
                return Err(WhitelistError::DuplicateEntry {
                    index,
                    identifier: entry.identifier,
                    account: entry.account,
                });
            }
        }
        Ok(Self { entries })
    }

    /// Parse a whitelist from JSON.
    ///
    /// Errors in a single entry carry that entry's index. In the map shape
    /// an identifier may appear only once.
    pub fn from_json_str(json: &str) -> Result<Self, WhitelistError> {
        let entries = match serde_json::from_str::<WhitelistFile<'_>>(json)? {
            WhitelistFile::Records(records) => records
                .iter()
                .enumerate()
                .map(|(index, raw)| parse_record(index, raw))
                .collect::<Result<Vec<_>, _>>()?,
            WhitelistFile::Map(pairs) => {
                let mut seen = BTreeSet::new();
                pairs
                    .iter()
                    .enumerate()
                    .map(|(index, (identifier, account))| {
                        let entry = parse_map_entry(index, identifier, account)?;
                        if !seen.insert(entry.identifier) {
                            return Err(WhitelistError::DuplicateIdentifier {
                                index,
                                identifier: entry.identifier,
                            });
                        }
                        Ok(entry)
                    })
                    .collect::<Result<Vec<_>, _>>()?
            }
        };
        Self::from_entries(entries)
    }

    /// Read and parse a whitelist file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WhitelistError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Entries in leaf index order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Leaf index of an entry.
    pub fn position(&self, identifier: &TokenId, account: &Address) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.identifier == *identifier && e.account == *account)
    }

    /// Leaves in entry order.
    pub fn leaves(&self) -> Vec<Leaf> {
        self.entries.iter().map(Entry::leaf).collect()
    }

    /// Build the tree for this whitelist.
    pub fn tree(&self, config: TreeConfig) -> Result<MerkleTree, MerkleError> {
        MerkleTree::build_with(&self.leaves(), config)
    }
}

fn parse_record(index: usize, raw: &RawValue) -> Result<Entry, WhitelistError> {
    let record: Record<'_> = serde_json::from_str(raw.get())
        .map_err(|source| WhitelistError::MalformedEntry { index, source })?;

    let identifier = match serde_json::from_str::<String>(record.identifier.get()) {
        Ok(text) => text.parse::<TokenId>(),
        Err(_) => TokenId::from_dec_str(record.identifier.get()),
    }
    .map_err(|source| WhitelistError::InvalidEntry { index, source })?;

    let account = parse_account(index, record.account)?;
    Ok(Entry::new(identifier, account))
}

fn parse_map_entry(
    index: usize,
    identifier: &str,
    account: &RawValue,
) -> Result<Entry, WhitelistError> {
    let identifier = identifier
        .parse::<TokenId>()
        .map_err(|source| WhitelistError::InvalidEntry { index, source })?;
    let account = parse_account(index, account)?;
    Ok(Entry::new(identifier, account))
}

fn parse_account(index: usize, raw: &RawValue) -> Result<Address, WhitelistError> {
    let text = serde_json::from_str::<String>(raw.get())
        .map_err(|source| WhitelistError::MalformedEntry { index, source })?;
    text.parse::<Address>()
        .map_err(|source| WhitelistError::InvalidEntry { index, source })
}
