//! The canonical chain: mining, validation and replay.

use std::collections::HashSet;
use std::sync::Arc;

use zeta_store::ChainStore;
use zeta_transactions::Transaction;
use zeta_types::{Address, Balance, BlockHash, ChainParams, Timestamp, TxHash};
use zeta_work::{meets_difficulty, CancelToken, WorkGenerator};

use crate::block::Block;
use crate::error::LedgerError;
use crate::genesis::{genesis_block, is_genesis_shape};

/// The result of a chain integrity walk.
///
/// Reported as a value, never an error: an invalid chain is a diagnostic
/// outcome, and the store never "fixes" anything.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChainValidity {
    Valid,
    Invalid { block_index: u64, reason: String },
}

impl ChainValidity {
    pub fn is_valid(&self) -> bool {
        matches!(self, ChainValidity::Valid)
    }

    /// Human-readable verdict: `"valid"` or the first violation found.
    pub fn reason(&self) -> String {
        match self {
            ChainValidity::Valid => "valid".to_string(),
            ChainValidity::Invalid { block_index, reason } => {
                format!("block {}: {}", block_index, reason)
            }
        }
    }
}

/// The append-only chain of blocks plus the parameters it is sealed under.
///
/// Owns the canonical block sequence and its persistence collaborator.
/// Blocks are never removed, reordered or mutated after `mine_block`
/// returns; reads only ever observe the immutable prefix.
pub struct Chain {
    store: Arc<dyn ChainStore<Block>>,
    blocks: Vec<Block>,
    params: ChainParams,
    confirmed_ids: HashSet<TxHash>,
}

impl Chain {
    /// Open a chain from its store, bootstrapping genesis if the load is
    /// empty. The genesis block is persisted like any other block.
    pub fn open(
        store: Arc<dyn ChainStore<Block>>,
        params: ChainParams,
    ) -> Result<Self, LedgerError> {
        let mut blocks = store.load_chain()?;
        if blocks.is_empty() {
            let genesis = genesis_block();
            store.append_block(&genesis)?;
            tracing::info!(hash = %genesis.hash, "genesis block created");
            blocks.push(genesis);
        } else if !is_genesis_shape(&blocks[0]) {
            return Err(LedgerError::CorruptChain {
                block_index: 0,
                reason: "loaded chain does not start with genesis".into(),
            });
        }

        let confirmed_ids = blocks
            .iter()
            .flat_map(|b| b.transactions.iter().map(Transaction::id))
            .collect();

        Ok(Self {
            store,
            blocks,
            params,
            confirmed_ids,
        })
    }

    pub fn len(&self) -> u64 {
        self.blocks.len() as u64
    }

    /// The chain is never empty; genesis is always present.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn last_block(&self) -> &Block {
        self.blocks.last().expect("chain always has genesis")
    }

    pub fn params(&self) -> &ChainParams {
        &self.params
    }

    /// Whether a transaction id is already sealed in some block.
    pub fn contains_transaction(&self, id: &TxHash) -> bool {
        self.confirmed_ids.contains(id)
    }

    /// Seal a new block from the given batch.
    ///
    /// Appends a mining-reward transaction for `miner` to the batch, solves
    /// the proof-of-work, persists the block, and only then appends it to
    /// the in-memory chain — a block is committed exactly when it is
    /// durable. On any error the chain is unchanged and the caller keeps
    /// responsibility for the batch.
    ///
    /// The proof-of-work search is CPU-bound and blocking; callers on an
    /// async path should run the search off the request path instead (see
    /// [`Chain::prepare_block`] / [`Chain::commit_block`], which split this
    /// operation so the search can run without holding the chain).
    pub fn mine_block(
        &mut self,
        batch: Vec<Transaction>,
        miner: &Address,
        cancel: &CancelToken,
    ) -> Result<&Block, LedgerError> {
        let (transactions, index, timestamp, previous_hash) = self.prepare_block(batch, miner);
        let prefix = Block::body_prefix(index, timestamp, &transactions, &previous_hash);
        let (nonce, hash) = WorkGenerator.solve(&prefix, self.params.difficulty, cancel)?;
        self.commit_block(Block {
            index,
            timestamp,
            transactions,
            previous_hash,
            nonce,
            hash,
        })
    }

    /// First half of mining: fix the block contents against the current tip.
    ///
    /// Appends the mining-reward transaction and returns everything the
    /// proof-of-work search needs. The caller must ensure no other block is
    /// committed between `prepare_block` and `commit_block` (the gateway
    /// serializes miners for this reason).
    pub fn prepare_block(
        &self,
        batch: Vec<Transaction>,
        miner: &Address,
    ) -> (Vec<Transaction>, u64, Timestamp, BlockHash) {
        let mut transactions = batch;
        transactions.push(Transaction::mining_reward(
            miner.clone(),
            self.params.mining_reward(),
            Timestamp::now(),
        ));
        (
            transactions,
            self.len(),
            Timestamp::now(),
            self.last_block().hash,
        )
    }

    /// Second half of mining: persist and append a solved block.
    ///
    /// Re-verifies the block against the tip and the difficulty predicate —
    /// the store trusts nothing it did not compute under its own lock.
    pub fn commit_block(&mut self, block: Block) -> Result<&Block, LedgerError> {
        if block.index != self.len() || block.previous_hash != self.last_block().hash {
            return Err(LedgerError::StaleBlock {
                block_index: block.index,
                chain_len: self.len(),
            });
        }
        let recomputed = block.compute_hash();
        if block.hash != recomputed || !meets_difficulty(&recomputed, self.params.difficulty) {
            return Err(LedgerError::CorruptChain {
                block_index: block.index,
                reason: "solved block failed hash or difficulty re-verification".into(),
            });
        }

        if let Err(e) = self.store.append_block(&block) {
            tracing::error!(index = block.index, error = %e, "failed to persist block");
            return Err(e.into());
        }

        self.confirmed_ids
            .extend(block.transactions.iter().map(Transaction::id));
        tracing::info!(
            index = block.index,
            hash = %block.hash,
            tx_count = block.transactions.len(),
            nonce = block.nonce,
            "block sealed"
        );
        self.blocks.push(block);
        Ok(self.last_block())
    }

    /// Walk the chain and verify every structural invariant, recomputing
    /// every hash — nothing stored is trusted. Returns the first violation.
    pub fn is_chain_valid(&self) -> ChainValidity {
        if !is_genesis_shape(&self.blocks[0]) {
            return ChainValidity::Invalid {
                block_index: 0,
                reason: "genesis block malformed or tampered".into(),
            };
        }

        for i in 1..self.blocks.len() {
            let block = &self.blocks[i];
            let previous = &self.blocks[i - 1];

            if block.index != i as u64 {
                return ChainValidity::Invalid {
                    block_index: i as u64,
                    reason: format!("index {} out of sequence", block.index),
                };
            }

            if block.previous_hash != previous.compute_hash() {
                return ChainValidity::Invalid {
                    block_index: i as u64,
                    reason: "previous-hash link does not match preceding block".into(),
                };
            }

            let recomputed = block.compute_hash();
            if block.hash != recomputed {
                return ChainValidity::Invalid {
                    block_index: i as u64,
                    reason: "stored hash does not match block contents".into(),
                };
            }

            if !meets_difficulty(&recomputed, self.params.difficulty) {
                return ChainValidity::Invalid {
                    block_index: i as u64,
                    reason: format!(
                        "hash does not meet difficulty {}",
                        self.params.difficulty
                    ),
                };
            }

            for tx in &block.transactions {
                if tx.id() != tx.compute_id() {
                    return ChainValidity::Invalid {
                        block_index: i as u64,
                        reason: format!("transaction {} id does not match contents", tx.id()),
                    };
                }
            }
        }

        ChainValidity::Valid
    }

    /// Replay all confirmed transactions to derive an address balance.
    ///
    /// The sender is debited amount + fee; the recipient is credited the
    /// amount. An address with no chain activity yields exactly zero.
    pub fn balance_of(&self, address: &Address) -> Balance {
        let mut balance = Balance::ZERO;
        for block in &self.blocks {
            for tx in &block.transactions {
                if &tx.sender() == address {
                    balance = balance.debit(tx.amount()).debit(tx.fee());
                }
                if tx.recipient() == address {
                    balance = balance.credit(tx.amount());
                }
            }
        }
        balance
    }

    /// Confirmed transactions touching an address, newest first, up to `limit`.
    pub fn transactions_for(&self, address: &Address, limit: usize) -> Vec<Transaction> {
        self.blocks
            .iter()
            .rev()
            .flat_map(|b| b.transactions.iter().rev())
            .filter(|tx| tx.touches(address))
            .take(limit)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zeta_store::MemoryStore;
    use zeta_types::Amount;

    fn addr(c: char) -> Address {
        Address::parse(std::iter::repeat(c).take(32).collect::<String>()).unwrap()
    }

    fn dev_chain() -> (Arc<MemoryStore<Block>>, Chain) {
        let store = Arc::new(MemoryStore::new());
        let chain = Chain::open(store.clone(), ChainParams::dev()).unwrap();
        (store, chain)
    }

    fn reward(to: &Address, zeta: u64, ts: u64) -> Transaction {
        Transaction::reward(to.clone(), Amount::from_zeta(zeta), "test".into(), Timestamp::new(ts))
            .unwrap()
    }

    #[test]
    fn open_bootstraps_and_persists_genesis() {
        let (store, chain) = dev_chain();
        assert_eq!(chain.len(), 1);
        assert_eq!(store.len(), 1);
        assert!(chain.is_chain_valid().is_valid());
    }

    #[test]
    fn reopen_preserves_chain() {
        let (store, mut chain) = dev_chain();
        let miner = addr('m');
        chain
            .mine_block(vec![reward(&miner, 5, 1)], &miner, &CancelToken::new())
            .unwrap();
        let tip = chain.last_block().hash;
        drop(chain);

        let reopened = Chain::open(store, ChainParams::dev()).unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.last_block().hash, tip);
        assert!(reopened.is_chain_valid().is_valid());
    }

    #[test]
    fn mined_block_carries_batch_plus_mining_reward() {
        let (_, mut chain) = dev_chain();
        let miner = addr('m');
        let user = addr('u');
        let tx = reward(&user, 7, 1);
        let tx_id = tx.id();

        let block = chain
            .mine_block(vec![tx], &miner, &CancelToken::new())
            .unwrap();
        assert_eq!(block.index, 1);
        assert_eq!(block.transactions.len(), 2);
        assert_eq!(block.transactions[0].id(), tx_id);
        assert_eq!(
            block.transactions[1].kind(),
            zeta_transactions::TxKind::MiningReward
        );
        assert_eq!(block.transactions[1].recipient(), &miner);
        assert!(chain.contains_transaction(&tx_id));
    }

    #[test]
    fn chain_is_append_only_and_blocks_stay_unchanged() {
        let (_, mut chain) = dev_chain();
        let miner = addr('m');

        chain.mine_block(vec![], &miner, &CancelToken::new()).unwrap();
        let first = chain.blocks()[1].clone();
        let len_before = chain.len();

        chain.mine_block(vec![], &miner, &CancelToken::new()).unwrap();
        assert!(chain.len() > len_before);

        let refetched = &chain.blocks()[1];
        assert_eq!(refetched.hash, first.hash);
        assert_eq!(refetched.nonce, first.nonce);
        assert_eq!(refetched.timestamp, first.timestamp);
        assert_eq!(refetched.transactions.len(), first.transactions.len());
    }

    #[test]
    fn hash_chain_links_hold() {
        let (_, mut chain) = dev_chain();
        let miner = addr('m');
        for _ in 0..3 {
            chain.mine_block(vec![], &miner, &CancelToken::new()).unwrap();
        }
        for i in 1..chain.blocks().len() {
            let prev = &chain.blocks()[i - 1];
            assert_eq!(
                chain.blocks()[i].previous_hash,
                Block::compute_block_hash(
                    prev.index,
                    prev.timestamp,
                    &prev.transactions,
                    &prev.previous_hash,
                    prev.nonce
                )
            );
        }
    }

    #[test]
    fn balance_replay_is_deterministic_and_zero_for_unknown() {
        let (_, mut chain) = dev_chain();
        let miner = addr('m');
        let user = addr('u');
        chain
            .mine_block(vec![reward(&user, 10, 1)], &miner, &CancelToken::new())
            .unwrap();

        let b1 = chain.balance_of(&user);
        let b2 = chain.balance_of(&user);
        assert_eq!(b1, b2);
        assert_eq!(b1.raw(), Amount::from_zeta(10).raw() as i128);

        assert_eq!(chain.balance_of(&addr('z')), Balance::ZERO);
    }

    #[test]
    fn sender_is_debited_amount_plus_fee() {
        let (_, mut chain) = dev_chain();
        let miner = addr('m');
        let keys = zeta_crypto::keypair_from_seed(&[3u8; 32]);
        let alice = addr('a');
        let bob = addr('b');

        let transfer = Transaction::transfer(
            alice.clone(),
            bob.clone(),
            Amount::from_zeta(4),
            Amount::new(50),
            "lunch".into(),
            Timestamp::new(2),
            &keys,
        )
        .unwrap();

        chain
            .mine_block(vec![transfer], &miner, &CancelToken::new())
            .unwrap();

        assert_eq!(
            chain.balance_of(&alice).raw(),
            -(Amount::from_zeta(4).raw() as i128) - 50
        );
        assert_eq!(
            chain.balance_of(&bob).raw(),
            Amount::from_zeta(4).raw() as i128
        );
    }

    #[test]
    fn history_is_newest_first_with_limit() {
        let (_, mut chain) = dev_chain();
        let miner = addr('m');
        let user = addr('u');

        chain
            .mine_block(vec![reward(&user, 1, 1)], &miner, &CancelToken::new())
            .unwrap();
        chain
            .mine_block(vec![reward(&user, 2, 2)], &miner, &CancelToken::new())
            .unwrap();
        chain
            .mine_block(vec![reward(&user, 3, 3)], &miner, &CancelToken::new())
            .unwrap();

        let history = chain.transactions_for(&user, 2);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].amount(), Amount::from_zeta(3));
        assert_eq!(history[1].amount(), Amount::from_zeta(2));

        assert!(chain.transactions_for(&addr('z'), 10).is_empty());
    }

    #[test]
    fn persistence_failure_leaves_chain_unchanged() {
        let (store, mut chain) = dev_chain();
        let miner = addr('m');
        store.fail_appends(true);

        let err = chain.mine_block(vec![reward(&miner, 1, 1)], &miner, &CancelToken::new());
        assert!(matches!(err, Err(LedgerError::Store(_))));
        assert_eq!(chain.len(), 1);
        assert!(chain.is_chain_valid().is_valid());
    }

    #[test]
    fn cancelled_mining_leaves_chain_unchanged() {
        let (_, mut chain) = dev_chain();
        let miner = addr('m');
        let cancel = CancelToken::new();
        cancel.cancel();

        let err = chain.mine_block(vec![reward(&miner, 1, 1)], &miner, &cancel);
        assert!(matches!(err, Err(LedgerError::Work(_))));
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn end_to_end_scenario_with_corruption() {
        let (_, mut chain) = dev_chain();
        let a = addr('a');

        let t1 = reward(&a, 10, 1);
        let block = chain
            .mine_block(vec![t1.clone()], &a, &CancelToken::new())
            .unwrap();
        assert_eq!(block.index, 1);
        assert_eq!(block.transactions.len(), 2);

        let expected = Amount::from_zeta(10).raw() as i128
            + chain.params().mining_reward().raw() as i128;
        assert_eq!(chain.balance_of(&a).raw(), expected);

        let validity = chain.is_chain_valid();
        assert!(validity.is_valid());
        assert_eq!(validity.reason(), "valid");

        // Corrupt a stored amount in block 1 and re-validate.
        if let Transaction::Signed(tx) = &mut chain.blocks[1].transactions[0] {
            tx.amount = Amount::from_zeta(1_000_000);
        }
        let validity = chain.is_chain_valid();
        assert!(!validity.is_valid());
        assert!(validity.reason().contains("block 1"));
    }

    #[test]
    fn validation_detects_broken_link() {
        let (_, mut chain) = dev_chain();
        let miner = addr('m');
        chain.mine_block(vec![], &miner, &CancelToken::new()).unwrap();
        chain.mine_block(vec![], &miner, &CancelToken::new()).unwrap();

        chain.blocks[2].previous_hash = zeta_types::BlockHash::new([9u8; 32]);
        let validity = chain.is_chain_valid();
        assert!(!validity.is_valid());
        assert!(validity.reason().contains("block 2"));
    }
}
