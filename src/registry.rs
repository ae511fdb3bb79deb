//! Process-wide registry de-duplicating opens on the same path.

use std::collections::HashMap;
use std::fs;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use tracing::debug;

use crate::codec::{DecodeValue, EncodeKey, EncodeValue};
use crate::constants::{DEFAULT_BACKUP_DIR, INDEX_LOG_SUFFIX};
use crate::core::store::{StoreConfig, WharfStore};
use crate::error::Result;

/// Map shared between a registry handle and every store opened through it,
/// so `WharfStore::close` can drop its own entry. The registry lock is
/// always taken before any per-store lock.
pub(crate) struct Shared {
    stores: RwLock<HashMap<String, Arc<WharfStore>>>,
}

impl Shared {
    pub(crate) fn remove(&self, name: &str) {
        self.stores.write().remove(name);
    }
}

/// Maps paths to open stores, making `open` idempotent per path and enabling
/// the process-wide `close_all` and `backup_all` sweeps.
///
/// Most callers use the [`default_registry`] singleton through the top-level
/// free functions; an explicit `Registry` keeps independent store universes
/// apart (tests, embedded sub-systems).
pub struct Registry {
    shared: Arc<Shared>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                stores: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Open `path` with the default configuration, or return the handle that
    /// is already open.
    pub fn open(&self, path: &str) -> Result<Arc<WharfStore>> {
        self.open_with(path, StoreConfig::default())
    }

    /// Open `path`, or return the existing handle. The configuration only
    /// applies to a fresh open; a registry hit ignores it.
    pub fn open_with(&self, path: &str, config: StoreConfig) -> Result<Arc<WharfStore>> {
        if let Some(db) = self.shared.stores.read().get(path) {
            return Ok(Arc::clone(db));
        }

        let mut stores = self.shared.stores.write();
        if let Some(db) = stores.get(path) {
            return Ok(Arc::clone(db));
        }
        let db = WharfStore::with_config(Arc::clone(&self.shared), path, config)?;
        stores.insert(path.to_string(), Arc::clone(&db));
        debug!(path, "store opened");
        Ok(db)
    }

    /// Handle for an already-open store, if any.
    pub fn get(&self, path: &str) -> Option<Arc<WharfStore>> {
        self.shared.stores.read().get(path).cloned()
    }

    /// Number of currently open stores.
    pub fn open_count(&self) -> usize {
        self.shared.stores.read().len()
    }

    /// Close every open store. Keeps going after a failure and returns the
    /// first error.
    pub fn close_all(&self) -> Result<()> {
        let stores: Vec<_> = self.shared.stores.read().values().cloned().collect();
        let mut first_err = None;
        for db in stores {
            if let Err(e) = db.close() {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Close `path` if it is open, then remove its file pair from disk. An
    /// empty path names an unnamed in-memory store: closing it is all there
    /// is to do.
    pub fn delete_file(&self, path: &str) -> Result<()> {
        if let Some(db) = self.get(path) {
            db.close()?;
        }
        if !path.is_empty() {
            fs::remove_file(path)?;
            fs::remove_file(format!("{path}{INDEX_LOG_SUFFIX}"))?;
        }
        Ok(())
    }

    /// Copy every open store into `dir` (default `"backup"`), one file pair
    /// per store, keys ascending. Best-effort: keeps going after a failure
    /// and returns the first error.
    pub fn backup_all(&self, dir: &str) -> Result<()> {
        let dir = if dir.is_empty() { DEFAULT_BACKUP_DIR } else { dir };
        let stores: Vec<_> = self.shared.stores.read().values().cloned().collect();
        let mut first_err = None;
        for db in stores {
            // Unnamed in-memory stores have no backup location
            if db.name().is_empty() {
                continue;
            }
            if let Err(e) = self.backup_one(&db, dir) {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn backup_one(&self, db: &WharfStore, dir: &str) -> Result<()> {
        let backup_path = format!("{}/{}", dir, db.name());
        // A stale backup from an earlier run would be replayed into the copy
        let _ = self.delete_file(&backup_path);
        let backup = self.open_with(&backup_path, StoreConfig::default())?;
        let keys = db.keys(None::<&[u8]>, 0, 0, true)?;
        for key in keys {
            let value = db.get_raw(&key)?;
            backup.set_raw(&key, &value)?;
        }
        backup.close()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// The registry behind the top-level free functions.
pub fn default_registry() -> &'static Registry {
    static DEFAULT: OnceLock<Registry> = OnceLock::new();
    DEFAULT.get_or_init(Registry::new)
}

// ---- lazy-open convenience layer over the default registry ----

/// Open `path` with the default configuration via the default registry.
pub fn open(path: &str) -> Result<Arc<WharfStore>> {
    default_registry().open(path)
}

/// Open `path` with an explicit configuration via the default registry.
pub fn open_with(path: &str, config: StoreConfig) -> Result<Arc<WharfStore>> {
    default_registry().open_with(path, config)
}

/// Store a key/value pair, opening `path` if needed.
pub fn set<K: EncodeKey, V: EncodeValue>(path: &str, key: K, value: V) -> Result<()> {
    open(path)?.set(key, value)
}

/// Retrieve a value, opening `path` if needed.
pub fn get<K: EncodeKey, V: DecodeValue>(path: &str, key: K) -> Result<V> {
    open(path)?.get(key)
}

/// Check whether a key exists, opening `path` if needed.
pub fn has<K: EncodeKey>(path: &str, key: K) -> Result<bool> {
    open(path)?.has(key)
}

/// Delete a key, opening `path` if needed.
pub fn delete<K: EncodeKey>(path: &str, key: K) -> Result<()> {
    open(path)?.delete(key)
}

/// Number of live keys, opening `path` if needed.
pub fn count(path: &str) -> Result<usize> {
    Ok(open(path)?.count())
}

/// Ordered key enumeration, opening `path` if needed.
pub fn keys<K: EncodeKey>(
    path: &str,
    from: Option<K>,
    limit: usize,
    offset: usize,
    asc: bool,
) -> Result<Vec<Vec<u8>>> {
    open(path)?.keys(from, limit, offset, asc)
}

/// Increment the counter at `key`, opening `path` if needed.
pub fn counter<K: EncodeKey>(path: &str, key: K, delta: i64) -> Result<i64> {
    open(path)?.counter(key, delta)
}

/// Close `path` if it is open in the default registry.
pub fn close(path: &str) -> Result<()> {
    match default_registry().get(path) {
        Some(db) => db.close(),
        None => Ok(()),
    }
}

/// Close every store open in the default registry.
pub fn close_all() -> Result<()> {
    default_registry().close_all()
}

/// Close `path` and remove its files.
pub fn delete_file(path: &str) -> Result<()> {
    default_registry().delete_file(path)
}

/// Back every open store up into `dir`.
pub fn backup_all(dir: &str) -> Result<()> {
    default_registry().backup_all(dir)
}
