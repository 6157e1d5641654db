use std::fmt;

use ethers_core::types::H160;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Lifecycle classification of a contract-creation transaction. Derived
/// from chain and mempool state on every query, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployStatus {
    /// Mined, executed successfully, and created the given contract.
    Success(H160),
    /// Mined but failed, or did not create a contract.
    Reverted,
    /// Known to the mempool but not yet included in a block.
    Pending,
    /// No record of the transaction anywhere.
    NotFound,
}

impl fmt::Display for DeployStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(address) => write!(f, "success:0x{}", hex::encode(address.as_bytes())),
            Self::Reverted => f.write_str("reverted"),
            Self::Pending => f.write_str("pending"),
            Self::NotFound => f.write_str("not_found"),
        }
    }
}

impl DeployStatus {
    fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "reverted" => Ok(Self::Reverted),
            "pending" => Ok(Self::Pending),
            "not_found" => Ok(Self::NotFound),
            other => {
                let address = other
                    .strip_prefix("success:0x")
                    .ok_or_else(|| format!("unknown deploy status {other}"))?;
                let mut raw = [0u8; 20];
                hex::decode_to_slice(address, &mut raw)
                    .map_err(|e| format!("invalid contract address in status {other}: {e}"))?;
                Ok(Self::Success(H160::from(raw)))
            }
        }
    }
}

impl Serialize for DeployStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DeployStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        DeployStatus::from_str(&String::deserialize(deserializer)?).map_err(serde::de::Error::custom)
    }
}
