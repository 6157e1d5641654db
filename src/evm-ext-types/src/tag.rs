use std::fmt;

use ethers_core::types::{H256, U64};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Reference to a point in the chain: an absolute height, one of the
/// symbolic keywords, or a block hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    Latest,
    Earliest,
    Pending,
    Number(U64),
    Hash(H256),
}

impl BlockTag {
    /// Parses the wire form of a tag. Heights may be quoted decimal or
    /// `0x`-prefixed hex; a 32-byte hex string is a block hash.
    pub fn from_str(s: &str) -> Result<BlockTag, String> {
        match s {
            "latest" => Ok(Self::Latest),
            "earliest" => Ok(Self::Earliest),
            "pending" => Ok(Self::Pending),
            other => match other.strip_prefix("0x").or_else(|| other.strip_prefix("0X")) {
                Some(digits) if digits.len() == 64 => {
                    let mut raw = [0u8; 32];
                    hex::decode_to_slice(digits, &mut raw)
                        .map_err(|e| format!("invalid block hash {other}: {e}"))?;
                    Ok(Self::Hash(H256::from(raw)))
                }
                Some(digits) => u64::from_str_radix(digits, 16)
                    .map(|n| Self::Number(n.into()))
                    .map_err(|e| format!("invalid block number {other}: {e}")),
                None => other
                    .parse::<u64>()
                    .map(|n| Self::Number(n.into()))
                    .map_err(|_| format!("unknown block tag {other}")),
            },
        }
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Earliest => f.write_str("earliest"),
            Self::Pending => f.write_str("pending"),
            Self::Number(n) => write!(f, "0x{n:x}"),
            Self::Hash(hash) => write!(f, "0x{}", hex::encode(hash.as_bytes())),
        }
    }
}

impl Serialize for BlockTag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for BlockTag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        BlockTag::from_str(&String::deserialize(deserializer)?.to_lowercase())
            .map_err(serde::de::Error::custom)
    }
}

impl From<u64> for BlockTag {
    fn from(n: u64) -> Self {
        Self::Number(n.into())
    }
}
