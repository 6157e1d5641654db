use std::sync::Arc;

use ethers_core::types::{H160, H256, U64};
use tokio_util::sync::CancellationToken;

use evm_ext_types::{ApiError, DeployStatus};

use crate::backend::{ChainReader, MempoolReader};

/// Classifies the lifecycle of a contract-creation transaction from the
/// chain's transaction index, block receipts and the mempool. Nothing is
/// persisted; every query recomputes from scratch.
pub struct DeployStatusResolver {
    chain: Arc<dyn ChainReader>,
    mempool: Arc<dyn MempoolReader>,
}

impl DeployStatusResolver {
    pub fn new(chain: Arc<dyn ChainReader>, mempool: Arc<dyn MempoolReader>) -> Self {
        Self { chain, mempool }
    }

    pub async fn status_of(
        &self,
        tx_hash: H256,
        cancel: &CancellationToken,
    ) -> Result<DeployStatus, ApiError> {
        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        let Some(block_hash) = self.chain.transaction_block_hash(tx_hash).await? else {
            if cancel.is_cancelled() {
                return Err(ApiError::Cancelled);
            }
            return Ok(match self.mempool.get(tx_hash).await? {
                Some(_) => DeployStatus::Pending,
                None => DeployStatus::NotFound,
            });
        };

        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        let Some(receipts) = self.chain.receipts_by_block_hash(block_hash).await? else {
            log::debug!("receipts for block {block_hash:?} unavailable");
            return Ok(DeployStatus::NotFound);
        };

        // First match wins should the index ever hold duplicates.
        let Some(receipt) = receipts.iter().find(|r| r.transaction_hash == tx_hash) else {
            log::warn!(
                "transaction {tx_hash:?} indexed in block {block_hash:?} but missing from its receipts"
            );
            return Ok(DeployStatus::NotFound);
        };

        let successful = receipt.status == Some(U64::one());
        Ok(match receipt.contract_address {
            Some(address) if successful && address != H160::zero() => DeployStatus::Success(address),
            _ => DeployStatus::Reverted,
        })
    }
}
