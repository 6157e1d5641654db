use jsonrpc_core::Params;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single call inside a batch, decoded up to its method name and raw
/// parameters. The transport has already stripped the envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCall {
    pub method: String,
    pub params: Params,
}

impl RawCall {
    pub fn new(method: impl Into<String>, params: Params) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }
}

/// Outcome of one call in a batch: the handler's native payload, or a
/// structured error value occupying the same slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CallOutcome {
    Error { error: String },
    Success(Value),
}

impl CallOutcome {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}
