use std::sync::Arc;

use ethers_core::types::{Block, H160, H256};
use jsonrpc_core::Params;
use serde_json::Value;

use evm_ext_types::{ApiError, BlockTag};

use crate::backend::{ChainReader, StateProvider};

use super::registry::{CallError, RpcHandler};

pub const ETH_GET_BALANCE: &str = "eth_getBalance";

/// `eth_getBalance`: account balance at a block, returned as a
/// `0x`-prefixed hex string with no leading zeros.
pub struct BalanceHandler {
    chain: Arc<dyn ChainReader>,
    state: Arc<dyn StateProvider>,
}

impl BalanceHandler {
    pub fn new(chain: Arc<dyn ChainReader>, state: Arc<dyn StateProvider>) -> Self {
        Self { chain, state }
    }

    async fn get_balance(&self, address: &str, tag: &str) -> Result<String, ApiError> {
        let address = parse_address(address)?;
        let tag = BlockTag::from_str(tag).map_err(ApiError::InvalidBlockTag)?;

        let block = self
            .resolve_block(tag)
            .await?
            .ok_or(ApiError::BlockNotFound(tag))?;

        let snapshot = self
            .state
            .snapshot_at(block.state_root)
            .await?
            .ok_or(ApiError::StateUnavailable(block.state_root))?;

        // An absent account reads as balance zero, not as an error.
        let balance = snapshot.balance_of(address);
        Ok(format!("{balance:#x}"))
    }

    /// Resolves a tag to the block it names. Symbolic keywords go through
    /// the chain's current view; `pending` reads the latest sealed block
    /// since this node exposes no speculative state.
    async fn resolve_block(&self, tag: BlockTag) -> Result<Option<Block<H256>>, ApiError> {
        let number = match tag {
            BlockTag::Number(number) => number.as_u64(),
            BlockTag::Latest | BlockTag::Pending => self.chain.latest_block_number().await?,
            BlockTag::Earliest => self.chain.earliest_block_number().await?,
            BlockTag::Hash(hash) => return Ok(self.chain.block_by_hash(hash).await?),
        };
        Ok(self.chain.block_by_number(number).await?)
    }
}

#[async_trait::async_trait]
impl RpcHandler for BalanceHandler {
    fn method(&self) -> &'static str {
        ETH_GET_BALANCE
    }

    async fn call(&self, params: Params) -> Result<Value, CallError> {
        let (address, tag): (String, String) =
            params.parse().map_err(|_| CallError::InvalidParams)?;
        let balance = self.get_balance(&address, &tag).await?;
        Ok(Value::String(balance))
    }
}

fn parse_address(s: &str) -> Result<H160, ApiError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    let mut raw = [0u8; 20];
    hex::decode_to_slice(digits, &mut raw)
        .map_err(|e| ApiError::InvalidAddress(format!("{s}: {e}")))?;
    Ok(H160::from(raw))
}
