//! The pending-transaction pool.
//!
//! Keyed by transaction id for duplicate detection, with insertion order
//! preserved — the order of the pool is the order of the mined batch and
//! therefore part of the block hash.
//!
//! A snapshot taken for mining stays tracked as in flight until its block
//! commits or the batch is restored. An in-flight id is still a duplicate:
//! during the proof-of-work search it is neither pending nor confirmed,
//! and without this tracking a resubmission could be sealed a second time.

use std::collections::HashSet;

use zeta_transactions::Transaction;
use zeta_types::TxHash;

/// Submitted-but-not-yet-sealed transactions.
#[derive(Default)]
pub struct PendingPool {
    txs: Vec<Transaction>,
    ids: HashSet<TxHash>,
    in_flight: HashSet<TxHash>,
}

impl PendingPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.txs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.txs.is_empty()
    }

    /// Whether an id is pending or part of an in-flight batch.
    pub fn contains(&self, id: &TxHash) -> bool {
        self.ids.contains(id) || self.in_flight.contains(id)
    }

    /// Insert a transaction. Returns `false` (without inserting) if a
    /// transaction with the same id is already pending or in flight.
    pub fn insert(&mut self, tx: Transaction) -> bool {
        let id = tx.id();
        if self.ids.contains(&id) || self.in_flight.contains(&id) {
            return false;
        }
        self.ids.insert(id);
        self.txs.push(tx);
        true
    }

    /// Take the whole pool in insertion order, leaving it empty. The taken
    /// ids stay tracked as in flight until [`PendingPool::batch_committed`]
    /// or [`PendingPool::restore`].
    pub fn snapshot_and_clear(&mut self) -> Vec<Transaction> {
        self.in_flight.extend(self.ids.drain());
        std::mem::take(&mut self.txs)
    }

    /// Forget an in-flight batch once its block is committed; duplicate
    /// checks for these ids are answered by the chain from here on.
    pub fn batch_committed(&mut self, batch: &[Transaction]) {
        for tx in batch {
            self.in_flight.remove(&tx.id());
        }
    }

    /// Return a previously taken snapshot to the front of the pool in its
    /// original order, ahead of anything submitted since.
    pub fn restore(&mut self, batch: Vec<Transaction>) {
        for tx in &batch {
            self.in_flight.remove(&tx.id());
        }
        let newer = std::mem::take(&mut self.txs);
        self.ids.clear();
        self.txs = Vec::with_capacity(batch.len() + newer.len());
        // A duplicate can only appear if the same id was resubmitted while
        // the batch was out; the restored copy wins.
        for tx in batch.into_iter().chain(newer) {
            if self.ids.insert(tx.id()) {
                self.txs.push(tx);
            }
        }
    }
}
