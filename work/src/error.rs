//! PoW error type.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkError {
    #[error("proof-of-work search cancelled")]
    Cancelled,

    #[error("nonce space exhausted at difficulty {difficulty}")]
    Exhausted { difficulty: u32 },
}
