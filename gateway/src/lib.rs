//! The transaction gateway.
//!
//! Validates inbound transactions into a pending pool, triggers mining off
//! the request path, and answers balance/history/validity queries by
//! delegating to the chain. This is the narrow interface the rest of the
//! application calls into.

pub mod error;
pub mod gateway;
pub mod pool;

pub use error::GatewayError;
pub use gateway::{ChainInfo, Gateway, RejectReason, Submission};
pub use pool::PendingPool;
