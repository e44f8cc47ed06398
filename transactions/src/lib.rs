//! Transaction types for the ZETA ledger.
//!
//! Transactions are a tagged sum over two payload shapes: user-signed
//! transfers (with Ed25519 credentials) and system-originated issuance
//! (mining rewards and platform transactions, which carry no signature).
//! Constructors validate their invariants; an unsigned non-system
//! transaction cannot be represented.

pub mod error;
pub mod kind;
pub mod transaction;
pub mod validation;

pub use error::TransactionError;
pub use kind::TxKind;
pub use transaction::{Credentials, SignedTx, SystemTx, Transaction};
pub use validation::validate_transaction;
