use ethers_core::types::H256;
use jsonrpc_core::{Error, ErrorCode};
use thiserror::Error;

use crate::tag::BlockTag;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Failures the RPC extensions report. Per-call failures inside a batch
/// are folded into the call's own result slot; only top-level conditions
/// (malformed input, cancellation) surface from the executor itself.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid block tag: {0}")]
    InvalidBlockTag(String),

    #[error("block doesn't exist: {0}")]
    BlockNotFound(BlockTag),

    #[error("no state data for root {0:?}")]
    StateUnavailable(H256),

    #[error("request cancelled")]
    Cancelled,

    #[error("backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

/// https://docs.alchemy.com/reference/error-reference#kovan-error-codes
impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        let code = match &err {
            ApiError::InvalidAddress(_) | ApiError::InvalidBlockTag(_) => ErrorCode::InvalidParams,
            ApiError::BlockNotFound(_) => ErrorCode::ServerError(-32001), // RESOURCE_NOT_FOUND
            _ => ErrorCode::ServerError(-32015), // EXECUTION_ERROR
        };
        Error {
            code,
            message: err.to_string(),
            data: None,
        }
    }
}
