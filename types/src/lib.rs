//! Fundamental types for the ZETA ledger.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: addresses, hashes, amounts, timestamps, key material, and
//! chain parameters.

pub mod address;
pub mod amount;
pub mod error;
pub mod hash;
pub mod keys;
pub mod params;
pub mod time;

pub use address::Address;
pub use amount::{Amount, Balance};
pub use error::ZetaError;
pub use hash::{BlockHash, TxHash};
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use params::ChainParams;
pub use time::Timestamp;
