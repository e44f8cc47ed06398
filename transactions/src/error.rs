//! Transaction error type.

use thiserror::Error;
use zeta_types::Address;

use crate::kind::TxKind;

/// Errors raised when constructing or validating a transaction.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransactionError {
    #[error("amount must be positive for {kind} transactions")]
    ZeroAmount { kind: TxKind },

    #[error("{kind} is not a user-signable transaction kind")]
    NotSignableKind { kind: TxKind },

    #[error("signature required for sender {0}")]
    MissingSignature(Address),

    #[error("signature verification failed")]
    InvalidSignature,

    #[error("{kind} transactions cannot be submitted externally")]
    NotSubmittable { kind: TxKind },
}
