//! Stateless transaction validation.
//!
//! These checks are structural and cryptographic only. Stateful checks
//! (duplicate ids against the pool and the chain) are done by the gateway.

use crate::error::TransactionError;
use crate::Transaction;

/// Validate a transaction ahead of admission to the pending pool.
///
/// Checks, in order: the kind is externally submittable, the amount is
/// positive for signed kinds, and the signature verifies against the
/// declared public key over the canonical payload (waived for
/// system-originated senders).
pub fn validate_transaction(tx: &Transaction) -> Result<(), TransactionError> {
    let kind = tx.kind();
    if !kind.is_submittable() {
        return Err(TransactionError::NotSubmittable { kind });
    }

    if kind.is_signable() && tx.amount().is_zero() {
        return Err(TransactionError::ZeroAmount { kind });
    }

    if !tx.verify() {
        return Err(TransactionError::InvalidSignature);
    }

    Ok(())
}
