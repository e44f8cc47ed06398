//! Storage error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("corrupt chain storage: {0}")]
    Corrupt(String),

    #[error("append failed: {0}")]
    AppendFailed(String),
}
