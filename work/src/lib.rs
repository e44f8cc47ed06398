//! Proof-of-work for block sealing.
//!
//! The difficulty predicate requires a block hash to start with a configured
//! number of zero hex digits. The generator searches the nonce space with
//! all available CPU cores and supports cooperative cancellation.

pub mod difficulty;
pub mod error;
pub mod generator;

pub use difficulty::meets_difficulty;
pub use error::WorkError;
pub use generator::{CancelToken, WorkGenerator};
