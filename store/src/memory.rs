//! In-memory chain store.
//!
//! Used by tests and short-lived tooling. Supports failure injection so
//! callers can exercise the "mining must not lose transactions" guarantee
//! without a real storage fault.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::{ChainRecord, ChainStore, StoreError};

/// A chain store backed by a `Vec`.
#[derive(Default)]
pub struct MemoryStore<B> {
    blocks: Mutex<Vec<B>>,
    fail_appends: AtomicBool,
}

impl<B: ChainRecord + Clone> MemoryStore<B> {
    pub fn new() -> Self {
        Self {
            blocks: Mutex::new(Vec::new()),
            fail_appends: AtomicBool::new(false),
        }
    }

    /// Make every subsequent `append_block` fail (failure injection).
    pub fn fail_appends(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::Relaxed);
    }

    /// Number of stored blocks.
    pub fn len(&self) -> usize {
        self.blocks.lock().expect("store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<B: ChainRecord + Clone + Send> ChainStore<B> for MemoryStore<B> {
    fn load_chain(&self) -> Result<Vec<B>, StoreError> {
        Ok(self.blocks.lock().expect("store lock poisoned").clone())
    }

    fn append_block(&self, block: &B) -> Result<(), StoreError> {
        if self.fail_appends.load(Ordering::Relaxed) {
            return Err(StoreError::AppendFailed("injected failure".into()));
        }
        self.blocks
            .lock()
            .expect("store lock poisoned")
            .push(block.clone());
        Ok(())
    }
}
