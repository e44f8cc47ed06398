//! Error type for the fundamental types.

use thiserror::Error;

/// Validation errors for the fundamental types.
///
/// Higher layers carry their own error enums; this one only covers what
/// can go wrong constructing the types in this crate.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ZetaError {
    #[error("invalid wallet address: {0}")]
    InvalidAddress(String),

    #[error("invalid hash string: {0}")]
    BadHash(String),
}
