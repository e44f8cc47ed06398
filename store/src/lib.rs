//! Chain persistence for the ZETA ledger.
//!
//! The ledger only needs two calls from its persistence collaborator:
//! load the full chain at startup and durably append one sealed block.
//! The trait is generic over the block type so this crate carries no
//! domain knowledge.

pub mod error;
pub mod file;
pub mod memory;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A record that can live in a chain store.
pub trait ChainRecord: Serialize + DeserializeOwned {
    /// Position in the chain (0 = genesis). Must be contiguous.
    fn index(&self) -> u64;
}

/// Persistence collaborator for an append-only chain.
///
/// A block must not be considered committed until `append_block` has
/// returned `Ok` — implementations are expected to be durable before
/// returning.
pub trait ChainStore<B: ChainRecord>: Send + Sync {
    /// Load the whole chain in index order. An empty result is not an
    /// error; the ledger bootstraps genesis on top of it.
    fn load_chain(&self) -> Result<Vec<B>, StoreError>;

    /// Durably append one sealed block.
    fn append_block(&self, block: &B) -> Result<(), StoreError>;
}
