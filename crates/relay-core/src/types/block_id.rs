//! Block selector parsing (spec §4.2).

use ethers_core::types::H256;
use serde::{
    de::{Error, Visitor},
    Deserialize, Deserializer,
};
use std::fmt;

/// One of `null`, `"latest"`, `"pending"`, `"earliest"`, a decimal/hex
/// block number, or a 32-byte block hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockId {
    Latest,
    Pending,
    Earliest,
    Number(u64),
    Hash(H256),
}

impl Default for BlockId {
    fn default() -> Self {
        BlockId::Latest
    }
}

impl<'de> Deserialize<'de> for BlockId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct BlockIdVisitor;

        impl<'de> Visitor<'de> for BlockIdVisitor {
            type Value = BlockId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "a block tag, number, or 32-byte hash")
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: Error,
            {
                Ok(BlockId::Latest)
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: Error,
            {
                Ok(BlockId::Latest)
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: Error,
            {
                match value {
                    "latest" => Ok(BlockId::Latest),
                    "pending" => Ok(BlockId::Pending),
                    "earliest" => Ok(BlockId::Earliest),
                    hash if hash.len() == 66 && hash.starts_with("0x") => {
                        hash.parse::<H256>().map(BlockId::Hash).map_err(Error::custom)
                    }
                    num => {
                        let stripped = num.strip_prefix("0x").unwrap_or(num);
                        let radix = if num.starts_with("0x") { 16 } else { 10 };
                        u64::from_str_radix(stripped, radix)
                            .map(BlockId::Number)
                            .map_err(|e| Error::custom(format!("invalid block selector: {e}")))
                    }
                }
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
            where
                E: Error,
            {
                self.visit_str(&value)
            }
        }

        deserializer.deserialize_any(BlockIdVisitor)
    }
}

/// A hex-encoded or decimal array index (`eth_getTransactionByBlock*AndIndex`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Index(pub usize);

impl From<Index> for usize {
    fn from(idx: Index) -> Self {
        idx.0
    }
}

impl<'de> Deserialize<'de> for Index {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IndexVisitor;

        impl<'de> Visitor<'de> for IndexVisitor {
            type Value = Index;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "hex-encoded or decimal index")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: Error,
            {
                if let Some(stripped) = value.strip_prefix("0x") {
                    usize::from_str_radix(stripped, 16).map(Index).map_err(Error::custom)
                } else {
                    value.parse::<usize>().map(Index).map_err(Error::custom)
                }
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
            where
                E: Error,
            {
                self.visit_str(&value)
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: Error,
            {
                Ok(Index(value as usize))
            }
        }

        deserializer.deserialize_any(IndexVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tags() {
        assert_eq!(serde_json::from_str::<BlockId>("\"latest\"").unwrap(), BlockId::Latest);
        assert_eq!(serde_json::from_str::<BlockId>("\"pending\"").unwrap(), BlockId::Pending);
        assert_eq!(serde_json::from_str::<BlockId>("\"earliest\"").unwrap(), BlockId::Earliest);
    }

    #[test]
    fn parses_hex_and_decimal_numbers() {
        assert_eq!(serde_json::from_str::<BlockId>("\"0x10\"").unwrap(), BlockId::Number(16));
        assert_eq!(serde_json::from_str::<BlockId>("\"16\"").unwrap(), BlockId::Number(16));
    }

    #[test]
    fn parses_hash() {
        let hash = format!("\"0x{}\"", "ab".repeat(32));
        assert!(matches!(serde_json::from_str::<BlockId>(&hash).unwrap(), BlockId::Hash(_)));
    }

    #[test]
    fn null_defaults_to_latest() {
        assert_eq!(serde_json::from_str::<BlockId>("null").unwrap(), BlockId::Latest);
    }
}
