//! PoW generation (multi-threaded CPU).

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use sha2::{Digest, Sha256};
use zeta_types::BlockHash;

use crate::difficulty::meets_difficulty;
use crate::WorkError;

/// Cooperative cancellation flag for an in-flight nonce search.
///
/// Cloning shares the flag; cancelling from any clone stops the search at
/// the next batch boundary.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Searches the nonce space for a block hash meeting the difficulty.
pub struct WorkGenerator;

/// Batch size per thread between cancellation checks.
const BATCH_SIZE: u64 = 4096;

impl WorkGenerator {
    /// Find a nonce such that `SHA-256(body_prefix || nonce_be)` meets the
    /// difficulty predicate.
    ///
    /// `body_prefix` is the canonical block serialization up to (excluding)
    /// the trailing nonce. The nonce space is strided across all available
    /// CPU cores via rayon; the first thread to find a valid nonce signals
    /// the others to stop. Returns the winning nonce and the resulting hash.
    pub fn solve(
        &self,
        body_prefix: &[u8],
        difficulty: u32,
        cancel: &CancelToken,
    ) -> Result<(u64, BlockHash), WorkError> {
        let base = Sha256::new_with_prefix(body_prefix);
        let found = AtomicU64::new(u64::MAX);
        let num_threads = rayon::current_num_threads().max(1);

        (0..num_threads).into_par_iter().for_each(|thread_id| {
            let mut nonce = thread_id as u64;
            let stride = num_threads as u64;

            loop {
                if found.load(Ordering::Relaxed) != u64::MAX || cancel.is_cancelled() {
                    return;
                }

                for _ in 0..BATCH_SIZE {
                    let mut hasher = base.clone();
                    hasher.update(nonce.to_be_bytes());
                    let hash = BlockHash::new(hasher.finalize().into());
                    if meets_difficulty(&hash, difficulty) {
                        found.store(nonce, Ordering::Relaxed);
                        return;
                    }
                    let (next, wrapped) = nonce.overflowing_add(stride);
                    if wrapped {
                        return;
                    }
                    nonce = next;
                }
            }
        });

        if cancel.is_cancelled() && found.load(Ordering::Relaxed) == u64::MAX {
            return Err(WorkError::Cancelled);
        }
        match found.load(Ordering::Relaxed) {
            u64::MAX => Err(WorkError::Exhausted { difficulty }),
            nonce => {
                let mut hasher = base;
                hasher.update(nonce.to_be_bytes());
                Ok((nonce, BlockHash::new(hasher.finalize().into())))
            }
        }
    }
}
