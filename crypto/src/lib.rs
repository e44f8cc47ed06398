//! Cryptographic primitives for the ZETA ledger.
//!
//! SHA-256 digests for transaction ids and block hashes, and Ed25519
//! signing/verification for transaction authorization.

pub mod hash;
pub mod keys;
pub mod sign;

pub use hash::{sha256, sha256_multi};
pub use keys::{generate_keypair, keypair_from_seed, public_from_private};
pub use sign::{sign_payload, verify_payload};
