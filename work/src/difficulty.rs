//! The difficulty predicate.

use zeta_types::BlockHash;

/// Whether a block hash satisfies the difficulty predicate: at least
/// `difficulty` leading zero hex digits.
pub fn meets_difficulty(hash: &BlockHash, difficulty: u32) -> bool {
    hash.leading_zero_nibbles() >= difficulty
}
