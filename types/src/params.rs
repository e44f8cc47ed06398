//! Chain parameters — the tunable values every ledger instance carries.

use crate::amount::{Amount, RAW_PER_ZETA};
use serde::{Deserialize, Serialize};

/// Configuration for a ledger instance.
///
/// The difficulty predicate and the mining reward are fixed at construction;
/// there is no in-band adjustment. Changing them only affects blocks sealed
/// afterwards — validation always checks a block against the difficulty the
/// chain currently enforces.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChainParams {
    /// Number of leading zero hex digits a block hash must carry.
    pub difficulty: u32,

    /// Reward credited to the miner with every sealed block (raw units).
    pub mining_reward_raw: u128,
}

impl ChainParams {
    /// Production-leaning defaults: difficulty 4, reward 1 ZETA.
    pub fn standard() -> Self {
        Self {
            difficulty: 4,
            mining_reward_raw: RAW_PER_ZETA,
        }
    }

    /// Low-difficulty defaults for development and tests.
    pub fn dev() -> Self {
        Self {
            difficulty: 1,
            mining_reward_raw: RAW_PER_ZETA,
        }
    }

    pub fn mining_reward(&self) -> Amount {
        Amount::new(self.mining_reward_raw)
    }
}

impl Default for ChainParams {
    fn default() -> Self {
        Self::standard()
    }
}
