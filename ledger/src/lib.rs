//! The ZETA chain — the canonical append-only sequence of blocks.
//!
//! This crate owns block sealing (mining), structural and hash-chain
//! validation, and the derived projections (balances, per-address history)
//! computed by replaying confirmed transactions.

pub mod block;
pub mod chain;
pub mod error;
pub mod genesis;

pub use block::Block;
pub use chain::{Chain, ChainValidity};
pub use error::LedgerError;
pub use genesis::genesis_block;
