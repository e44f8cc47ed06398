//! Ledger error type.

use thiserror::Error;
use zeta_store::StoreError;
use zeta_work::WorkError;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("proof of work failed: {0}")]
    Work(#[from] WorkError),

    #[error("loaded chain is invalid at block {block_index}: {reason}")]
    CorruptChain { block_index: u64, reason: String },

    #[error("block {block_index} no longer extends the tip (chain length {chain_len})")]
    StaleBlock { block_index: u64, chain_len: u64 },
}
