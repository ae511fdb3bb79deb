use std::sync::Arc;

use crate::constants::*;
use crate::error::Result;
use crate::registry::{default_registry, Registry};

use super::WharfStore;

/// Where values live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreMode {
    /// Values live on disk and are read back on every get.
    #[default]
    OnDisk,
    /// Every live value is also held in RAM. Writes still go to disk when a
    /// path is given; with an empty path nothing touches disk at all.
    MemoryFirst,
}

/// Configuration options for a store.
///
/// Use [`StoreBuilder`] for a more ergonomic way to configure the store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub file_mode: u32,
    pub dir_mode: u32,
    /// Background fsync interval in seconds; 0 disables the syncer.
    pub sync_interval_secs: u64,
    pub store_mode: StoreMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            file_mode: DEFAULT_FILE_MODE,
            dir_mode: DEFAULT_DIR_MODE,
            sync_interval_secs: 0,
            store_mode: StoreMode::OnDisk,
        }
    }
}

/// Builder for opening a store with custom configuration.
///
/// # Example
///
/// ```no_run
/// use wharfdb::WharfStore;
///
/// # fn main() -> wharfdb::Result<()> {
/// let db = WharfStore::builder()
///     .sync_interval_secs(1)
///     .open("data/sessions")?;
/// # Ok(())
/// # }
/// ```
pub struct StoreBuilder {
    config: StoreConfig,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self {
            config: StoreConfig::default(),
        }
    }

    /// Permission bits for newly created files. Default: 0o666.
    pub fn file_mode(mut self, mode: u32) -> Self {
        self.config.file_mode = mode;
        self
    }

    /// Permission bits for created parent directories. Default: 0o777.
    pub fn dir_mode(mut self, mode: u32) -> Self {
        self.config.dir_mode = mode;
        self
    }

    /// Enable the background syncer with the given tick interval.
    ///
    /// 0 (the default) leaves fsync to the operating system until `flush`
    /// or `close`.
    pub fn sync_interval_secs(mut self, secs: u64) -> Self {
        self.config.sync_interval_secs = secs;
        self
    }

    pub fn store_mode(mut self, mode: StoreMode) -> Self {
        self.config.store_mode = mode;
        self
    }

    /// Shorthand for `store_mode(StoreMode::MemoryFirst)`.
    pub fn memory_first(mut self) -> Self {
        self.config.store_mode = StoreMode::MemoryFirst;
        self
    }

    /// Open through the process-wide default registry.
    pub fn open(self, path: &str) -> Result<Arc<WharfStore>> {
        default_registry().open_with(path, self.config)
    }

    /// Open through an explicit registry.
    pub fn open_in(self, registry: &Registry, path: &str) -> Result<Arc<WharfStore>> {
        registry.open_with(path, self.config)
    }
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
