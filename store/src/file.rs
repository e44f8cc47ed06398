//! File-backed chain store.
//!
//! One bincode-encoded file per block under a data directory
//! (`block_0000000000.bin`, numbered by index). Appends write to a
//! temporary file, fsync, then rename, so a crash never leaves a
//! half-written block visible to `load_chain`.

use std::fs;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use crate::{ChainRecord, ChainStore, StoreError};

/// A chain store keeping one file per block in a directory.
pub struct FileStore<B> {
    dir: PathBuf,
    _marker: PhantomData<B>,
}

impl<B: ChainRecord> FileStore<B> {
    /// Open (creating if needed) a file store at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            _marker: PhantomData,
        })
    }

    fn block_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!("block_{:010}.bin", index))
    }
}

impl<B: ChainRecord + Send> ChainStore<B> for FileStore<B>
where
    B: Sync,
{
    fn load_chain(&self) -> Result<Vec<B>, StoreError> {
        let mut paths: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.extension().is_some_and(|ext| ext == "bin")
                    && p.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.starts_with("block_"))
            })
            .collect();
        paths.sort();

        let mut blocks = Vec::with_capacity(paths.len());
        for path in paths {
            let bytes = fs::read(&path)?;
            let block: B = bincode::deserialize(&bytes)
                .map_err(|e| StoreError::Serialization(format!("{}: {e}", path.display())))?;
            if block.index() != blocks.len() as u64 {
                return Err(StoreError::Corrupt(format!(
                    "expected block index {}, found {} in {}",
                    blocks.len(),
                    block.index(),
                    path.display()
                )));
            }
            blocks.push(block);
        }
        Ok(blocks)
    }

    fn append_block(&self, block: &B) -> Result<(), StoreError> {
        let final_path = self.block_path(block.index());
        if final_path.exists() {
            return Err(StoreError::AppendFailed(format!(
                "block {} already stored",
                block.index()
            )));
        }

        let bytes =
            bincode::serialize(block).map_err(|e| StoreError::Serialization(e.to_string()))?;

        let tmp_path = self.dir.join(format!("block_{:010}.tmp", block.index()));
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp_path, &final_path)?;

        tracing::debug!(index = block.index(), path = %final_path.display(), "block persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Rec {
        index: u64,
        payload: String,
    }

    impl ChainRecord for Rec {
        fn index(&self) -> u64 {
            self.index
        }
    }

    fn rec(index: u64) -> Rec {
        Rec {
            index,
            payload: format!("block {index}"),
        }
    }

    #[test]
    fn empty_directory_loads_empty_chain() {
        let dir = tempfile::tempdir().unwrap();
        let store: FileStore<Rec> = FileStore::open(dir.path()).unwrap();
        assert!(store.load_chain().unwrap().is_empty());
    }

    #[test]
    fn append_then_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store: FileStore<Rec> = FileStore::open(dir.path()).unwrap();
        store.append_block(&rec(0)).unwrap();
        store.append_block(&rec(1)).unwrap();
        store.append_block(&rec(2)).unwrap();

        // A fresh handle sees the same chain.
        let store2: FileStore<Rec> = FileStore::open(dir.path()).unwrap();
        let chain = store2.load_chain().unwrap();
        assert_eq!(chain, vec![rec(0), rec(1), rec(2)]);
    }

    #[test]
    fn duplicate_index_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store: FileStore<Rec> = FileStore::open(dir.path()).unwrap();
        store.append_block(&rec(0)).unwrap();
        assert!(store.append_block(&rec(0)).is_err());
    }

    #[test]
    fn gap_in_indices_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store: FileStore<Rec> = FileStore::open(dir.path()).unwrap();
        store.append_block(&rec(0)).unwrap();
        store.append_block(&rec(1)).unwrap();
        fs::remove_file(dir.path().join("block_0000000001.bin")).unwrap();
        store.append_block(&rec(2)).unwrap();

        assert!(matches!(
            store.load_chain(),
            Err(StoreError::Corrupt(_))
        ));
    }

    #[test]
    fn leftover_tmp_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store: FileStore<Rec> = FileStore::open(dir.path()).unwrap();
        store.append_block(&rec(0)).unwrap();
        fs::write(dir.path().join("block_0000000001.tmp"), b"partial").unwrap();
        assert_eq!(store.load_chain().unwrap().len(), 1);
    }
}
