use std::collections::HashMap;
use std::sync::Arc;

use ethers_core::types::{Block, Transaction, TransactionReceipt, H160, H256, U256};
use tokio::sync::Mutex;

use super::{ChainReader, MempoolReader, StateProvider, StateSnapshot};

/// In-memory chain, state and mempool collaborator used in tests.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    /// Blocks keyed by height.
    pub blocks: Arc<Mutex<HashMap<u64, Block<H256>>>>,
    /// Receipts of each block, keyed by block hash.
    pub receipts: Arc<Mutex<HashMap<H256, Vec<TransactionReceipt>>>>,
    /// Transaction hash to containing block hash.
    pub tx_index: Arc<Mutex<HashMap<H256, H256>>>,
    /// Account balances of each state root.
    pub balances: Arc<Mutex<HashMap<H256, HashMap<H160, U256>>>>,
    /// Not-yet-mined transactions keyed by hash.
    pub mempool: Arc<Mutex<HashMap<H256, Transaction>>>,
}

impl InMemoryBackend {
    /// Inserts a block together with its receipts and indexes its
    /// transactions. The block must carry both `number` and `hash`.
    pub async fn insert_block(&self, block: Block<H256>, receipts: Vec<TransactionReceipt>) {
        let number = block.number.expect("block without number").as_u64();
        let hash = block.hash.expect("block without hash");

        let mut tx_index = self.tx_index.lock().await;
        for tx_hash in &block.transactions {
            tx_index.insert(*tx_hash, hash);
        }

        self.receipts.lock().await.insert(hash, receipts);
        self.blocks.lock().await.insert(number, block);
    }

    pub async fn set_balance(&self, state_root: H256, address: H160, balance: U256) {
        self.balances
            .lock()
            .await
            .entry(state_root)
            .or_default()
            .insert(address, balance);
    }

    pub async fn add_pending_transaction(&self, tx: Transaction) {
        self.mempool.lock().await.insert(tx.hash, tx);
    }
}

struct InMemorySnapshot {
    accounts: HashMap<H160, U256>,
}

impl StateSnapshot for InMemorySnapshot {
    fn balance_of(&self, address: H160) -> U256 {
        self.accounts.get(&address).copied().unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl ChainReader for InMemoryBackend {
    async fn latest_block_number(&self) -> anyhow::Result<u64> {
        self.blocks
            .lock()
            .await
            .keys()
            .max()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("chain is empty"))
    }

    async fn earliest_block_number(&self) -> anyhow::Result<u64> {
        self.blocks
            .lock()
            .await
            .keys()
            .min()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("chain is empty"))
    }

    async fn block_by_number(&self, number: u64) -> anyhow::Result<Option<Block<H256>>> {
        Ok(self.blocks.lock().await.get(&number).cloned())
    }

    async fn block_by_hash(&self, hash: H256) -> anyhow::Result<Option<Block<H256>>> {
        Ok(self
            .blocks
            .lock()
            .await
            .values()
            .find(|block| block.hash == Some(hash))
            .cloned())
    }

    async fn transaction_block_hash(&self, tx_hash: H256) -> anyhow::Result<Option<H256>> {
        Ok(self.tx_index.lock().await.get(&tx_hash).copied())
    }

    async fn receipts_by_block_hash(
        &self,
        block_hash: H256,
    ) -> anyhow::Result<Option<Vec<TransactionReceipt>>> {
        Ok(self.receipts.lock().await.get(&block_hash).cloned())
    }
}

#[async_trait::async_trait]
impl StateProvider for InMemoryBackend {
    async fn snapshot_at(
        &self,
        state_root: H256,
    ) -> anyhow::Result<Option<Arc<dyn StateSnapshot>>> {
        Ok(self.balances.lock().await.get(&state_root).map(|accounts| {
            Arc::new(InMemorySnapshot {
                accounts: accounts.clone(),
            }) as Arc<dyn StateSnapshot>
        }))
    }
}

#[async_trait::async_trait]
impl MempoolReader for InMemoryBackend {
    async fn get(&self, tx_hash: H256) -> anyhow::Result<Option<Transaction>> {
        Ok(self.mempool.lock().await.get(&tx_hash).cloned())
    }
}
