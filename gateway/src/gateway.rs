//! The gateway itself: submission, mining and queries.

use std::sync::{Mutex, RwLock};

use serde::Serialize;
use zeta_ledger::{Block, Chain, ChainValidity};
use zeta_transactions::{validate_transaction, Transaction, TransactionError};
use zeta_types::{Address, Amount, Balance, Timestamp, TxHash};
use zeta_work::{CancelToken, WorkGenerator};

use crate::error::GatewayError;
use crate::pool::PendingPool;

/// Why a submission was turned away.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// Same id already pending or already confirmed.
    Duplicate,
    /// Structural or cryptographic validation failed.
    Invalid(TransactionError),
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::Duplicate => write!(f, "duplicate"),
            RejectReason::Invalid(e) => write!(f, "{e}"),
        }
    }
}

/// The outcome of a submission. Rejection is an expected, common result —
/// it is a value, never an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    Accepted { id: TxHash },
    Rejected { reason: RejectReason },
}

impl Submission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Submission::Accepted { .. })
    }
}

/// Summary of the chain for status endpoints.
#[derive(Clone, Debug, Serialize)]
pub struct ChainInfo {
    pub length: u64,
    pub pending_transactions: usize,
    pub difficulty: u32,
    pub mining_reward_raw: u128,
    pub last_block_index: u64,
    pub is_valid: bool,
}

/// The transaction gateway.
///
/// Pool mutations (duplicate-check-and-insert, snapshot-and-clear) happen
/// under the pool mutex; the chain sits behind an `RwLock` taken briefly
/// for reads and only for the final append of a mined block. The
/// proof-of-work search holds neither lock, so queries never block on a
/// mining operation in progress. A separate async mutex serializes miners,
/// which keeps the tip stable between snapshot and commit.
pub struct Gateway {
    chain: RwLock<Chain>,
    pool: Mutex<PendingPool>,
    mine_lock: tokio::sync::Mutex<()>,
    mine_cancel: Mutex<Option<CancelToken>>,
}

impl Gateway {
    pub fn new(chain: Chain) -> Self {
        Self {
            chain: RwLock::new(chain),
            pool: Mutex::new(PendingPool::new()),
            mine_lock: tokio::sync::Mutex::new(()),
            mine_cancel: Mutex::new(None),
        }
    }

    /// Validate a transaction and admit it to the pending pool.
    ///
    /// The duplicate check and the insert happen under one lock so two
    /// concurrent submissions of the same id can never both be accepted.
    pub fn submit(&self, tx: Transaction) -> Submission {
        if let Err(e) = validate_transaction(&tx) {
            tracing::warn!(id = %tx.id(), kind = %tx.kind(), reason = %e, "transaction rejected");
            return Submission::Rejected {
                reason: RejectReason::Invalid(e),
            };
        }

        let id = tx.id();
        let mut pool = self.pool.lock().expect("pool lock poisoned");
        let confirmed = self
            .chain
            .read()
            .expect("chain lock poisoned")
            .contains_transaction(&id);
        if confirmed || !pool.insert(tx) {
            tracing::warn!(id = %id, "duplicate transaction rejected");
            return Submission::Rejected {
                reason: RejectReason::Duplicate,
            };
        }

        tracing::info!(id = %id, pending = pool.len(), "transaction accepted");
        Submission::Accepted { id }
    }

    /// Convenience for platform-issued rewards (system sender, no signature).
    pub fn create_reward(
        &self,
        recipient: Address,
        amount: Amount,
        reason: String,
    ) -> Submission {
        match Transaction::reward(recipient, amount, reason, Timestamp::now()) {
            Ok(tx) => self.submit(tx),
            Err(e) => Submission::Rejected {
                reason: RejectReason::Invalid(e),
            },
        }
    }

    /// Seal the current pending pool into a new block.
    ///
    /// Takes an atomic snapshot of the pool, runs the proof-of-work search
    /// on a blocking worker, then commits the solved block. On any failure
    /// the snapshot is returned to the front of the pool unchanged — no
    /// pending transaction is ever lost.
    pub async fn mine(&self, miner: Address) -> Result<Block, GatewayError> {
        let _miners = self.mine_lock.lock().await;

        let batch = self
            .pool
            .lock()
            .expect("pool lock poisoned")
            .snapshot_and_clear();

        match self.solve_and_commit(batch.clone(), &miner).await {
            Ok(block) => {
                // The batch is in the chain's confirmed set now; stop
                // tracking it as in flight.
                self.pool
                    .lock()
                    .expect("pool lock poisoned")
                    .batch_committed(&batch);
                Ok(block)
            }
            Err(e) => {
                tracing::warn!(error = %e, returned = batch.len(), "mining failed, batch returned to pool");
                self.pool
                    .lock()
                    .expect("pool lock poisoned")
                    .restore(batch);
                Err(e)
            }
        }
    }

    async fn solve_and_commit(
        &self,
        batch: Vec<Transaction>,
        miner: &Address,
    ) -> Result<Block, GatewayError> {
        let (transactions, index, timestamp, previous_hash, difficulty) = {
            let chain = self.chain.read().expect("chain lock poisoned");
            let (transactions, index, timestamp, previous_hash) =
                chain.prepare_block(batch, miner);
            (
                transactions,
                index,
                timestamp,
                previous_hash,
                chain.params().difficulty,
            )
        };

        let cancel = CancelToken::new();
        *self.mine_cancel.lock().expect("cancel lock poisoned") = Some(cancel.clone());

        let prefix = Block::body_prefix(index, timestamp, &transactions, &previous_hash);
        let joined = tokio::task::spawn_blocking(move || {
            WorkGenerator.solve(&prefix, difficulty, &cancel)
        })
        .await;

        // The token is dead once the search has returned, however it ended.
        *self.mine_cancel.lock().expect("cancel lock poisoned") = None;
        let (nonce, hash) = joined
            .map_err(|e| GatewayError::MiningTask(e.to_string()))?
            .map_err(zeta_ledger::LedgerError::from)?;

        let mut chain = self.chain.write().expect("chain lock poisoned");
        let block = chain.commit_block(Block {
            index,
            timestamp,
            transactions,
            previous_hash,
            nonce,
            hash,
        })?;
        Ok(block.clone())
    }

    /// Cancel an in-flight mining operation, if any. Its batch returns to
    /// the pending pool unconfirmed.
    pub fn abort_mining(&self) {
        if let Some(cancel) = self
            .mine_cancel
            .lock()
            .expect("cancel lock poisoned")
            .as_ref()
        {
            cancel.cancel();
        }
    }

    pub fn balance(&self, address: &Address) -> Balance {
        self.chain
            .read()
            .expect("chain lock poisoned")
            .balance_of(address)
    }

    pub fn history(&self, address: &Address, limit: usize) -> Vec<Transaction> {
        self.chain
            .read()
            .expect("chain lock poisoned")
            .transactions_for(address, limit)
    }

    pub fn validate_chain(&self) -> ChainValidity {
        self.chain
            .read()
            .expect("chain lock poisoned")
            .is_chain_valid()
    }

    pub fn pending_count(&self) -> usize {
        self.pool.lock().expect("pool lock poisoned").len()
    }

    pub fn chain_info(&self) -> ChainInfo {
        // Pool before chain: the same lock order submit uses.
        let pending_transactions = self.pending_count();
        let chain = self.chain.read().expect("chain lock poisoned");
        ChainInfo {
            length: chain.len(),
            pending_transactions,
            difficulty: chain.params().difficulty,
            mining_reward_raw: chain.params().mining_reward_raw,
            last_block_index: chain.last_block().index,
            is_valid: chain.is_chain_valid().is_valid(),
        }
    }
}
