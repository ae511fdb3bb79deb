use std::sync::atomic::Ordering;

use tracing::debug;

use crate::error::Result;

use super::WharfStore;

impl WharfStore {
    /// Fsync both files. A no-op for a pure in-memory store.
    pub fn flush(&self) -> Result<()> {
        let inner = self.inner.read();
        inner.ensure_open()?;
        if let Some(files) = &inner.files {
            files.sync_all()?;
            self.stats.sync_count.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }

    /// One syncer tick: writer lock, fsync both files, errors swallowed. The
    /// next explicit `flush` or `close` surfaces persistent IO failures.
    pub(crate) fn sync_quietly(&self) {
        let inner = self.inner.write();
        if inner.closed {
            return;
        }
        if let Some(files) = &inner.files {
            match files.sync_all() {
                Ok(()) => {
                    self.stats.sync_count.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    self.stats.sync_failures.fetch_add(1, Ordering::Relaxed);
                    debug!(error = %e, "background fsync failed");
                }
            }
        }
    }

    /// Stop the syncer, fsync and close both files, and drop this store's
    /// registry entry. Idempotent; operations on a closed store fail with
    /// `StoreClosed`.
    pub fn close(&self) -> Result<()> {
        if let Some(syncer) = self.syncer.lock().take() {
            syncer.stop();
        }

        let mut result = Ok(());
        {
            let mut inner = self.inner.write();
            if inner.closed {
                return Ok(());
            }
            inner.closed = true;
            if let Some(files) = inner.files.take() {
                result = files.sync_all();
            }
        }

        self.registry.remove(&self.name);
        debug!(name = %self.name, "store closed");
        result
    }
}

impl Drop for WharfStore {
    fn drop(&mut self) {
        // The last reference may be dropped on the syncer thread itself, so
        // signal it without joining.
        if let Some(syncer) = self.syncer.get_mut().take() {
            syncer.detach();
        }
        let inner = self.inner.get_mut();
        if let Some(files) = inner.files.take() {
            let _ = files.sync_all();
        }
    }
}
