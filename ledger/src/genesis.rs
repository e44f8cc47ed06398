//! Genesis block creation.
//!
//! The genesis block is fixed: index 0, no transactions, previous hash
//! all-zero, nonce 0, timestamp at the epoch. Every field is constant, so
//! the genesis hash is identical for every ledger instance. The difficulty
//! predicate does not apply to genesis.

use crate::block::Block;
use zeta_types::{BlockHash, Timestamp};

/// Create the genesis block.
pub fn genesis_block() -> Block {
    let mut block = Block {
        index: 0,
        timestamp: Timestamp::EPOCH,
        transactions: Vec::new(),
        previous_hash: BlockHash::ZERO,
        nonce: 0,
        hash: BlockHash::ZERO,
    };
    block.hash = block.compute_hash();
    block
}

/// Whether a stored block has the exact genesis shape.
pub fn is_genesis_shape(block: &Block) -> bool {
    block.index == 0
        && block.transactions.is_empty()
        && block.previous_hash.is_zero()
        && block.hash == block.compute_hash()
}
