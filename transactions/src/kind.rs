//! Transaction kinds and their canonical wire tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of operation a transaction represents.
///
/// The numeric tags are part of the canonical serialization and therefore
/// part of the hash-chain contract — they must never be reassigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxKind {
    /// User-to-user transfer.
    Transfer,
    /// Platform-issued reward to a user.
    Reward,
    /// Platform-issued penalty (debits the target via a system send).
    Penalty,
    /// Reward minted to the miner when a block is sealed.
    MiningReward,
    /// Other system-originated transaction.
    System,
    /// Purchase of a platform resource.
    Purchase,
    /// Refund of a previous purchase.
    Refund,
}

impl TxKind {
    /// Canonical serialization tag (frozen).
    pub fn tag(&self) -> u8 {
        match self {
            TxKind::Transfer => 0,
            TxKind::Reward => 1,
            TxKind::Penalty => 2,
            TxKind::MiningReward => 3,
            TxKind::System => 4,
            TxKind::Purchase => 5,
            TxKind::Refund => 6,
        }
    }

    /// Whether this kind is carried by the user-signed payload shape.
    pub fn is_signable(&self) -> bool {
        !matches!(self, TxKind::MiningReward | TxKind::System)
    }

    /// Whether the gateway accepts this kind from external submitters.
    /// Mining rewards are only ever minted by the ledger itself.
    pub fn is_submittable(&self) -> bool {
        !matches!(self, TxKind::MiningReward)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Transfer => "transfer",
            TxKind::Reward => "reward",
            TxKind::Penalty => "penalty",
            TxKind::MiningReward => "mining_reward",
            TxKind::System => "system",
            TxKind::Purchase => "purchase",
            TxKind::Refund => "refund",
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
