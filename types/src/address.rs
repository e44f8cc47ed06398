//! Wallet address type.
//!
//! Addresses are opaque validated strings: either the reserved `system`
//! address (the origin of mining rewards and platform-issued transactions)
//! or 20–64 characters of hex or base58.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ZetaError;

/// The reserved sender address for system-originated transactions.
pub const SYSTEM_ADDRESS: &str = "system";

/// A validated wallet address.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// The reserved system address.
    pub fn system() -> Self {
        Self(SYSTEM_ADDRESS.to_string())
    }

    /// Parse and validate an address string.
    pub fn parse(raw: impl Into<String>) -> Result<Self, ZetaError> {
        let s = raw.into();
        if s == SYSTEM_ADDRESS {
            return Ok(Self(s));
        }
        if s.len() < 20 || s.len() > 64 {
            return Err(ZetaError::InvalidAddress(s));
        }
        let hex = s.bytes().all(|b| b.is_ascii_hexdigit());
        let base58 = s.bytes().all(is_base58_byte);
        if hex || base58 {
            Ok(Self(s))
        } else {
            Err(ZetaError::InvalidAddress(s))
        }
    }

    /// The wallet address owned by an Ed25519 public key: the lowercase
    /// hex of its 32 bytes (64 characters, inside the valid length range).
    pub fn from_public_key(key: &crate::keys::PublicKey) -> Self {
        Self(crate::hash::hex::encode(key.as_bytes()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_system(&self) -> bool {
        self.0 == SYSTEM_ADDRESS
    }
}

// Bitcoin-style base58: no 0, O, I, l.
fn is_base58_byte(b: u8) -> bool {
    matches!(b, b'1'..=b'9' | b'A'..=b'H' | b'J'..=b'N' | b'P'..=b'Z' | b'a'..=b'k' | b'm'..=b'z')
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
