//! Entry field types.
//!
//! `TokenId` is an unsigned 256-bit integer held as 32 big-endian bytes,
//! exactly the word Solidity packs for a `uint256`. `Address` is a raw
//! 20-byte account.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::encoding::{strip_hex_prefix, EncodingError};

/// Unsigned 256-bit identifier (big-endian).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TokenId([u8; 32]);

impl TokenId {
    /// Zero identifier.
    pub const ZERO: Self = Self([0; 32]);

    /// Wrap 32 big-endian bytes.
    pub const fn from_be_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Build from a big-endian byte string of at most 32 bytes.
    ///
    /// Shorter inputs are left-padded with zeros.
    pub fn from_be_slice(bytes: &[u8]) -> Result<Self, EncodingError> {
        if bytes.len() > 32 {
            return Err(EncodingError::IdentifierWidth(bytes.len()));
        }
        let mut word = [0u8; 32];
        word[32 - bytes.len()..].copy_from_slice(bytes);
        Ok(Self(word))
    }

    /// Parse a decimal string. Leading zeros are allowed.
    pub fn from_dec_str(s: &str) -> Result<Self, EncodingError> {
        if s.is_empty() {
            return Err(EncodingError::Empty);
        }

        let mut word = [0u8; 32];
        for ch in s.chars() {
            let digit = ch.to_digit(10).ok_or(EncodingError::InvalidDigit(ch))?;

            // word = word * 10 + digit
            let mut carry = digit;
            for byte in word.iter_mut().rev() {
                let v = u32::from(*byte) * 10 + carry;
                *byte = (v & 0xff) as u8;
                carry = v >> 8;
            }
            if carry != 0 {
                return Err(EncodingError::IdentifierOverflow);
            }
        }
        Ok(Self(word))
    }

    /// Parse a hex string (prefix optional, odd length allowed).
    pub fn from_hex_str(s: &str) -> Result<Self, EncodingError> {
        let cleaned = strip_hex_prefix(s);
        if cleaned.is_empty() {
            return Err(EncodingError::Empty);
        }
        if cleaned.len() > 64 {
            return Err(EncodingError::IdentifierWidth(cleaned.len().div_ceil(2)));
        }
        let padded = format!("{:0>64}", cleaned);
        let mut word = [0u8; 32];
        hex::decode_to_slice(&padded, &mut word)?;
        Ok(Self(word))
    }

    /// Big-endian bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    fn to_dec_string(self) -> String {
        let mut work = self.0;
        let mut digits = Vec::new();

        while work.iter().any(|b| *b != 0) {
            // work = work / 10, remainder is the next digit
            let mut rem = 0u32;
            for byte in work.iter_mut() {
                let v = (rem << 8) | u32::from(*byte);
                *byte = (v / 10) as u8;
                rem = v % 10;
            }
            digits.push(b'0' + rem as u8);
        }

        if digits.is_empty() {
            return "0".to_string();
        }
        digits.iter().rev().map(|d| char::from(*d)).collect()
    }
}

impl From<u64> for TokenId {
    fn from(value: u64) -> Self {
        Self::from(u128::from(value))
    }
}

impl From<u128> for TokenId {
    fn from(value: u128) -> Self {
        let mut word = [0u8; 32];
        word[16..].copy_from_slice(&value.to_be_bytes());
        Self(word)
    }
}

impl FromStr for TokenId {
    type Err = EncodingError;

    /// Decimal by default, hex when prefixed with `0x`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
            Self::from_hex_str(trimmed)
        } else {
            Self::from_dec_str(trimmed)
        }
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_dec_string())
    }
}

impl fmt::Debug for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenId({})", self)
    }
}

impl Serialize for TokenId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_dec_string())
    }
}

impl<'de> Deserialize<'de> for TokenId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TokenIdVisitor;

        impl<'de> Visitor<'de> for TokenIdVisitor {
            type Value = TokenId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative integer or a decimal/0x-hex string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<TokenId, E> {
                Ok(TokenId::from(v))
            }

            fn visit_u128<E: de::Error>(self, v: u128) -> Result<TokenId, E> {
                Ok(TokenId::from(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<TokenId, E> {
                u64::try_from(v)
                    .map(TokenId::from)
                    .map_err(|_| E::custom("identifier must be non-negative"))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<TokenId, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(TokenIdVisitor)
    }
}

/// 20-byte account address.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address([u8; 20]);

impl Address {
    /// Wrap 20 raw bytes.
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Build from a byte slice that must be exactly 20 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, EncodingError> {
        <[u8; 20]>::try_from(bytes)
            .map(Self)
            .map_err(|_| EncodingError::AddressLength(bytes.len()))
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl FromStr for Address {
    type Err = EncodingError;

    /// 40 hex characters, `0x` optional. Mixed-case checksums are accepted
    /// but not validated.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned = strip_hex_prefix(s);
        if cleaned.len() != 40 {
            return Err(EncodingError::AddressHexLength(cleaned.len()));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(cleaned, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_id_decimal_leading_zeros() {
        let id: TokenId = "056665177".parse().unwrap();
        assert_eq!(id, TokenId::from(56_665_177u64));
        assert_eq!(id.to_string(), "56665177");
    }

    #[test]
    fn test_token_id_zero() {
        let id: TokenId = "0".parse().unwrap();
        assert_eq!(id, TokenId::ZERO);
        assert_eq!(id.to_string(), "0");
    }

    #[test]
    fn test_token_id_big_endian_layout() {
        let id = TokenId::from(0x0102u64);
        let bytes = id.as_bytes();
        assert_eq!(bytes[30], 0x01);
        assert_eq!(bytes[31], 0x02);
        assert!(bytes[..30].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_token_id_max_value() {
        let max = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        let id: TokenId = max.parse().unwrap();
        assert_eq!(id.as_bytes(), &[0xff; 32]);
        assert_eq!(id.to_string(), max);
    }

    #[test]
    fn test_token_id_overflow() {
        let too_big = "115792089237316195423570985008687907853269984665640564039457584007913129639936";
        assert_eq!(too_big.parse::<TokenId>(), Err(EncodingError::IdentifierOverflow));
    }

    #[test]
    fn test_token_id_invalid_digit() {
        assert_eq!("12a".parse::<TokenId>(), Err(EncodingError::InvalidDigit('a')));
        assert_eq!("".parse::<TokenId>(), Err(EncodingError::Empty));
    }

    #[test]
    fn test_token_id_hex() {
        let id: TokenId = "0x1ff".parse().unwrap();
        assert_eq!(id, TokenId::from(511u64));
        assert!(TokenId::from_hex_str(&"f".repeat(65)).is_err());
    }

    #[test]
    fn test_token_id_from_be_slice() {
        assert_eq!(TokenId::from_be_slice(&[1, 0]).unwrap(), TokenId::from(256u64));
        assert_eq!(
            TokenId::from_be_slice(&[0u8; 33]),
            Err(EncodingError::IdentifierWidth(33))
        );
    }

    #[test]
    fn test_token_id_serde() {
        let id: TokenId = serde_json::from_str("\"007\"").unwrap();
        assert_eq!(id, TokenId::from(7u64));
        let id: TokenId = serde_json::from_str("42").unwrap();
        assert_eq!(id, TokenId::from(42u64));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"42\"");
        assert!(serde_json::from_str::<TokenId>("-1").is_err());
    }

    #[test]
    fn test_address_parse_with_and_without_prefix() {
        let a: Address = "0xa111C225A0aFd5aD64221B1bc1D5d817e5D3Ca15".parse().unwrap();
        let b: Address = "a111c225a0afd5ad64221b1bc1d5d817e5d3ca15".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "0xa111c225a0afd5ad64221b1bc1d5d817e5d3ca15");
    }

    #[test]
    fn test_address_invalid() {
        assert_eq!("0x1234".parse::<Address>(), Err(EncodingError::AddressHexLength(4)));
        assert!(matches!(
            "0xzz11c225a0afd5ad64221b1bc1d5d817e5d3ca15".parse::<Address>(),
            Err(EncodingError::InvalidHex(_))
        ));
        assert_eq!(Address::from_slice(&[0u8; 32]), Err(EncodingError::AddressLength(32)));
    }
}
