use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};

use crate::core::index::KeyIndex;
use crate::core::syncer::Syncer;
use crate::error::{Result, WharfError};
use crate::stats::Statistics;
use crate::storage::FilePair;

use super::{recovery, StoreConfig, StoreInner, StoreMode, WharfStore};

impl WharfStore {
    /// Construct a store bound to `registry`, replaying any existing index
    /// log. Called with the registry write lock held, so two opens of the
    /// same path never race here.
    pub(crate) fn with_config(
        registry: Arc<crate::registry::Shared>,
        path: &str,
        config: StoreConfig,
    ) -> Result<Arc<Self>> {
        if path.is_empty() && config.store_mode != StoreMode::MemoryFirst {
            return Err(WharfError::InvalidPath);
        }

        let stats = Arc::new(Statistics::new());
        let mut index = KeyIndex::new();
        let files = if path.is_empty() {
            None
        } else {
            let mut files = FilePair::open(path, config.file_mode, config.dir_mode)?;
            recovery::replay_log(
                &mut index,
                &mut files,
                config.store_mode == StoreMode::MemoryFirst,
                &stats,
            )?;
            Some(files)
        };

        let store = Arc::new(Self {
            name: path.to_string(),
            config,
            inner: RwLock::new(StoreInner {
                files,
                index,
                closed: false,
            }),
            counter_lock: Mutex::new(()),
            stats,
            syncer: Mutex::new(None),
            registry,
        });

        if store.config.sync_interval_secs > 0 && store.inner.read().files.is_some() {
            let interval = Duration::from_secs(store.config.sync_interval_secs);
            *store.syncer.lock() = Some(Syncer::spawn(Arc::downgrade(&store), interval));
        }

        Ok(store)
    }
}
