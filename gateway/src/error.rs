//! Gateway error type.

use thiserror::Error;
use zeta_ledger::LedgerError;

/// Errors from gateway operations.
///
/// Submission rejections are not errors — they are reported through
/// [`crate::Submission`]. These variants cover mining failures, where the
/// caller is guaranteed the pending batch has been returned to the pool.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("mining task failed: {0}")]
    MiningTask(String),
}
