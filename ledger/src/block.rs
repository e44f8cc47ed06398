//! Blocks and the canonical block hash.
//!
//! Canonical block hash input (frozen — the interoperability contract):
//!
//! ```text
//! index (8 BE) || timestamp secs (8 BE) || previous_hash (32) ||
//! tx_count (8 BE) || canonical bytes of each transaction in order ||
//! nonce (8 BE)
//! ```
//!
//! Digest is SHA-256. Transaction order is insertion order and is part of
//! both the hash input and the balance replay order.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use zeta_store::ChainRecord;
use zeta_transactions::Transaction;
use zeta_types::{BlockHash, Timestamp};

/// An immutable, hash-linked batch of confirmed transactions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: Timestamp,
    pub transactions: Vec<Transaction>,
    pub previous_hash: BlockHash,
    pub nonce: u64,
    pub hash: BlockHash,
}

impl Block {
    /// The canonical serialization of everything except the trailing nonce.
    ///
    /// The PoW search appends candidate nonces to exactly these bytes.
    pub fn body_prefix(
        index: u64,
        timestamp: Timestamp,
        transactions: &[Transaction],
        previous_hash: &BlockHash,
    ) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&index.to_be_bytes());
        buf.extend_from_slice(&timestamp.as_secs().to_be_bytes());
        buf.extend_from_slice(previous_hash.as_bytes());
        buf.extend_from_slice(&(transactions.len() as u64).to_be_bytes());
        for tx in transactions {
            buf.extend_from_slice(&tx.canonical_bytes());
        }
        buf
    }

    /// Deterministic block hash over the canonical field ordering.
    pub fn compute_block_hash(
        index: u64,
        timestamp: Timestamp,
        transactions: &[Transaction],
        previous_hash: &BlockHash,
        nonce: u64,
    ) -> BlockHash {
        let mut hasher = Sha256::new();
        hasher.update(Self::body_prefix(index, timestamp, transactions, previous_hash));
        hasher.update(nonce.to_be_bytes());
        BlockHash::new(hasher.finalize().into())
    }

    /// Recompute this block's hash from its own contents.
    ///
    /// Equals the stored `hash` field for an uncorrupted block; validation
    /// never trusts the stored value.
    pub fn compute_hash(&self) -> BlockHash {
        Self::compute_block_hash(
            self.index,
            self.timestamp,
            &self.transactions,
            &self.previous_hash,
            self.nonce,
        )
    }
}

impl ChainRecord for Block {
    fn index(&self) -> u64 {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zeta_types::{Address, Amount};

    fn addr(c: char) -> Address {
        Address::parse(std::iter::repeat(c).take(32).collect::<String>()).unwrap()
    }

    fn sample_txs() -> Vec<Transaction> {
        vec![
            Transaction::reward(addr('a'), Amount::from_zeta(5), "r1".into(), Timestamp::new(10))
                .unwrap(),
            Transaction::mining_reward(addr('b'), Amount::from_zeta(1), Timestamp::new(11)),
        ]
    }

    #[test]
    fn block_hash_is_deterministic() {
        let txs = sample_txs();
        let h1 = Block::compute_block_hash(1, Timestamp::new(99), &txs, &BlockHash::ZERO, 7);
        let h2 = Block::compute_block_hash(1, Timestamp::new(99), &txs, &BlockHash::ZERO, 7);
        assert_eq!(h1, h2);
    }

    #[test]
    fn every_field_affects_the_hash() {
        let txs = sample_txs();
        let base = Block::compute_block_hash(1, Timestamp::new(99), &txs, &BlockHash::ZERO, 7);

        assert_ne!(
            base,
            Block::compute_block_hash(2, Timestamp::new(99), &txs, &BlockHash::ZERO, 7)
        );
        assert_ne!(
            base,
            Block::compute_block_hash(1, Timestamp::new(100), &txs, &BlockHash::ZERO, 7)
        );
        assert_ne!(
            base,
            Block::compute_block_hash(1, Timestamp::new(99), &txs, &BlockHash::new([1; 32]), 7)
        );
        assert_ne!(
            base,
            Block::compute_block_hash(1, Timestamp::new(99), &txs, &BlockHash::ZERO, 8)
        );
        assert_ne!(
            base,
            Block::compute_block_hash(1, Timestamp::new(99), &txs[..1], &BlockHash::ZERO, 7)
        );
    }

    #[test]
    fn transaction_order_is_part_of_the_hash() {
        let txs = sample_txs();
        let mut reversed = txs.clone();
        reversed.reverse();
        let h1 = Block::compute_block_hash(1, Timestamp::new(99), &txs, &BlockHash::ZERO, 7);
        let h2 = Block::compute_block_hash(1, Timestamp::new(99), &reversed, &BlockHash::ZERO, 7);
        assert_ne!(h1, h2);
    }

    #[test]
    fn hash_equals_body_prefix_plus_nonce() {
        let txs = sample_txs();
        let prefix = Block::body_prefix(3, Timestamp::new(50), &txs, &BlockHash::ZERO);
        let mut hasher = Sha256::new();
        hasher.update(&prefix);
        hasher.update(9u64.to_be_bytes());
        let manual = BlockHash::new(hasher.finalize().into());
        assert_eq!(
            manual,
            Block::compute_block_hash(3, Timestamp::new(50), &txs, &BlockHash::ZERO, 9)
        );
    }

    #[test]
    fn corrupting_a_transaction_changes_compute_hash() {
        let mut block = Block {
            index: 1,
            timestamp: Timestamp::new(99),
            transactions: sample_txs(),
            previous_hash: BlockHash::ZERO,
            nonce: 7,
            hash: BlockHash::ZERO,
        };
        block.hash = block.compute_hash();
        let honest = block.hash;

        if let Transaction::System(tx) = &mut block.transactions[1] {
            tx.amount = Amount::from_zeta(1_000_000);
        }
        assert_ne!(block.compute_hash(), honest);
    }
}
