pub mod in_memory;

use std::sync::Arc;

use ethers_core::types::{Block, Transaction, TransactionReceipt, H160, H256, U256};

/// Read access to the canonical chain: headers, the transaction index and
/// block receipts. Absence is `Ok(None)`; `Err` means the collaborator
/// itself could not be reached.
#[async_trait::async_trait]
pub trait ChainReader: Send + Sync {
    /// Height of the chain head.
    async fn latest_block_number(&self) -> anyhow::Result<u64>;

    /// Height of the earliest block the node still holds.
    async fn earliest_block_number(&self) -> anyhow::Result<u64>;

    /// Get a block by height.
    async fn block_by_number(&self, number: u64) -> anyhow::Result<Option<Block<H256>>>;

    /// Get a block by hash.
    async fn block_by_hash(&self, hash: H256) -> anyhow::Result<Option<Block<H256>>>;

    /// Canonical transaction index: hash of the block containing the
    /// transaction, if it has been mined.
    async fn transaction_block_hash(&self, tx_hash: H256) -> anyhow::Result<Option<H256>>;

    /// All receipts of a block, in transaction order. `None` when the
    /// block's receipts have been pruned.
    async fn receipts_by_block_hash(
        &self,
        block_hash: H256,
    ) -> anyhow::Result<Option<Vec<TransactionReceipt>>>;
}

/// A read-only view of account state at a fixed state root.
pub trait StateSnapshot: Send + Sync {
    /// Balance of the account; zero if the account does not exist.
    fn balance_of(&self, address: H160) -> U256;
}

/// Opens state snapshots by root.
#[async_trait::async_trait]
pub trait StateProvider: Send + Sync {
    /// Snapshot rooted at `state_root`, or `None` if it has been pruned.
    async fn snapshot_at(&self, state_root: H256)
        -> anyhow::Result<Option<Arc<dyn StateSnapshot>>>;
}

/// Read access to the pool of not-yet-mined transactions.
#[async_trait::async_trait]
pub trait MempoolReader: Send + Sync {
    async fn get(&self, tx_hash: H256) -> anyhow::Result<Option<Transaction>>;
}
