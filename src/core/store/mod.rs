use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::codec::EncodeKey;
use crate::core::index::KeyIndex;
use crate::core::syncer::Syncer;
use crate::error::{Result, WharfError};
use crate::stats::{Statistics, StatsSnapshot};
use crate::storage::FilePair;

// Re-export public types
pub use self::builder::{StoreBuilder, StoreConfig, StoreMode};

// Module declarations
pub mod atomic;
pub mod builder;
pub mod init;
pub mod operations;
pub mod persistence;
pub mod range;
pub mod recovery;

/// Embedded key/value store.
///
/// The complete key set lives in memory while values sit on disk at known
/// offsets; an append-only index log makes recovery a single forward scan.
/// One writer and many readers share a store within a process, and a
/// [`Registry`](crate::registry::Registry) de-duplicates opens on the same
/// path.
///
/// # Thread Safety
///
/// All methods take `&self` and are safe to call concurrently. Read
/// operations run in parallel; writes are exclusive.
pub struct WharfStore {
    // Registry key; empty for an unnamed in-memory store
    pub(super) name: String,

    pub(super) config: StoreConfig,

    // Mutable state under the store's reader-writer lock
    pub(super) inner: RwLock<StoreInner>,

    // Serializes counter read-modify-write cycles
    pub(super) counter_lock: Mutex<()>,

    pub(super) stats: Arc<Statistics>,

    // Background fsync task, present while sync_interval_secs > 0
    pub(super) syncer: Mutex<Option<Syncer>>,

    // Shared registry map, so close can drop its own entry
    pub(super) registry: Arc<crate::registry::Shared>,
}

pub(crate) struct StoreInner {
    // None for pure in-memory stores and after close
    pub(crate) files: Option<FilePair>,
    pub(crate) index: KeyIndex,
    pub(crate) closed: bool,
}

impl StoreInner {
    pub(crate) fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(WharfError::StoreClosed)
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Debug for WharfStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WharfStore").field("name", &self.name).finish()
    }
}

impl WharfStore {
    /// Create a builder for configuring a store.
    ///
    /// # Example
    ///
    /// ```rust
    /// use wharfdb::{StoreMode, WharfStore};
    ///
    /// # fn main() -> wharfdb::Result<()> {
    /// let db = WharfStore::builder()
    ///     .store_mode(StoreMode::MemoryFirst)
    ///     .open("")?;
    /// db.set("greeting", "hello")?;
    /// db.close()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    /// The path this store was opened under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of live keys.
    pub fn count(&self) -> usize {
        self.inner.read().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Check whether a key exists.
    pub fn has<K: EncodeKey>(&self, key: K) -> Result<bool> {
        let k = key.encode_key()?;
        let inner = self.inner.read();
        inner.ensure_open()?;
        Ok(inner.index.contains(&k))
    }

    /// Combined size of the value file and the index log.
    pub fn file_size(&self) -> Result<u64> {
        let inner = self.inner.read();
        inner.ensure_open()?;
        match &inner.files {
            Some(files) => files.total_size(),
            None => Err(WharfError::InvalidPath),
        }
    }

    /// Get statistics snapshot
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub(crate) fn memory_first(&self) -> bool {
        self.config.store_mode == StoreMode::MemoryFirst
    }
}
