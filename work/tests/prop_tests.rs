use proptest::prelude::*;

use zeta_types::BlockHash;
use zeta_work::{meets_difficulty, CancelToken, WorkGenerator};

proptest! {
    /// A solved nonce always hashes to something meeting the difficulty.
    #[test]
    fn solved_nonce_meets_difficulty(
        prefix in prop::collection::vec(any::<u8>(), 0..256),
        difficulty in 0u32..=2,
    ) {
        let cancel = CancelToken::new();
        let (_, hash) = WorkGenerator.solve(&prefix, difficulty, &cancel).unwrap();
        prop_assert!(meets_difficulty(&hash, difficulty));
    }

    /// Zero difficulty accepts every hash.
    #[test]
    fn zero_difficulty_accepts_all(bytes in prop::array::uniform32(0u8..)) {
        prop_assert!(meets_difficulty(&BlockHash::new(bytes), 0));
    }

    /// The difficulty predicate is monotone: meeting a harder target
    /// implies meeting every easier one.
    #[test]
    fn difficulty_is_monotone(bytes in prop::array::uniform32(0u8..), d in 1u32..64) {
        let hash = BlockHash::new(bytes);
        if meets_difficulty(&hash, d) {
            prop_assert!(meets_difficulty(&hash, d - 1));
        }
    }

    /// A pre-cancelled token aborts the search no matter the input.
    #[test]
    fn pre_cancelled_never_solves(prefix in prop::collection::vec(any::<u8>(), 0..64)) {
        let cancel = CancelToken::new();
        cancel.cancel();
        // Difficulty high enough that a solution cannot be stumbled on
        // before the cancellation check.
        let result = WorkGenerator.solve(&prefix, 60, &cancel);
        prop_assert!(result.is_err());
    }
}
