//! Hex rendering and input-shape errors.
//!
//! Roots, leaves and proof elements cross the engine boundary as
//! `0x`-prefixed lowercase hex. Parsing accepts either case and an optional
//! prefix.

use thiserror::Error;

use super::hash::Hash32;

/// Malformed input shape for an identifier, address or hash.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodingError {
    /// Nothing to parse.
    #[error("empty input")]
    Empty,

    /// Identifier byte string wider than 256 bits.
    #[error("identifier too wide: expected at most 32 bytes, got {0}")]
    IdentifierWidth(usize),

    /// Decimal identifier does not fit in 256 bits.
    #[error("identifier exceeds 256 bits")]
    IdentifierOverflow,

    /// Non-digit character in a decimal identifier.
    #[error("invalid decimal digit {0:?}")]
    InvalidDigit(char),

    /// Raw address is not exactly 20 bytes.
    #[error("invalid address length: expected 20 bytes, got {0}")]
    AddressLength(usize),

    /// Hex address is not exactly 40 characters.
    #[error("invalid address: expected 40 hex chars, got {0}")]
    AddressHexLength(usize),

    /// Hash is not exactly 32 bytes.
    #[error("invalid hash length: expected 32 bytes, got {0}")]
    HashLength(usize),

    /// Not valid hexadecimal.
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// Strip an optional `0x`/`0X` prefix and surrounding whitespace.
pub fn strip_hex_prefix(s: &str) -> &str {
    let trimmed = s.trim();
    trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed)
}

/// Render bytes as `0x`-prefixed lowercase hex.
pub fn to_hex<T: AsRef<[u8]>>(bytes: T) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parse a 32-byte hash from hex.
pub fn parse_hash32(s: &str) -> Result<Hash32, EncodingError> {
    let cleaned = strip_hex_prefix(s);
    if cleaned.is_empty() {
        return Err(EncodingError::Empty);
    }
    let bytes = hex::decode(cleaned)?;
    Hash32::try_from(bytes.as_slice()).map_err(|_| EncodingError::HashLength(bytes.len()))
}

/// Serde adapter for a single hash as a hex string.
pub mod hex32 {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    use super::{parse_hash32, to_hex};
    use crate::core::hash::Hash32;

    /// Serialize as `0x…`.
    pub fn serialize<S: Serializer>(hash: &Hash32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_hex(hash))
    }

    /// Deserialize from hex, prefix optional.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Hash32, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_hash32(&s).map_err(D::Error::custom)
    }
}

/// Serde adapter for a list of hashes as hex strings.
pub mod hex32_vec {
    use serde::{de::Error as _, ser::SerializeSeq, Deserialize, Deserializer, Serializer};

    use super::{parse_hash32, to_hex};
    use crate::core::hash::Hash32;

    /// Serialize as `["0x…", …]`.
    pub fn serialize<S: Serializer>(hashes: &[Hash32], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(hashes.len()))?;
        for hash in hashes {
            seq.serialize_element(&to_hex(hash))?;
        }
        seq.end()
    }

    /// Deserialize from a list of hex strings.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Hash32>, D::Error> {
        let strings = Vec::<String>::deserialize(deserializer)?;
        strings
            .iter()
            .map(|s| parse_hash32(s).map_err(D::Error::custom))
            .collect()
    }
}
