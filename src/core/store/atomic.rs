use crate::codec::{self, EncodeKey};
use crate::error::{Result, WharfError};

use super::WharfStore;

impl WharfStore {
    /// Increment the signed 64-bit integer stored at `key` and return the
    /// new value.
    ///
    /// The whole read-modify-write cycle runs under a store-wide mutex, so
    /// parallel increments of the same key compose without losing updates.
    /// A missing key starts at 0; `delta` may be negative.
    ///
    /// # Errors
    ///
    /// * `DecodeFailed` - the existing value is not an encoded i64
    ///
    /// # Example
    ///
    /// ```rust
    /// # use wharfdb::{StoreMode, WharfStore};
    /// # fn main() -> wharfdb::Result<()> {
    /// # let db = WharfStore::builder().store_mode(StoreMode::MemoryFirst).open("")?;
    /// assert_eq!(db.counter("visits", 1)?, 1);
    /// assert_eq!(db.counter("visits", 5)?, 6);
    /// assert_eq!(db.counter("visits", -2)?, 4);
    /// # db.close()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn counter<K: EncodeKey>(&self, key: K, delta: i64) -> Result<i64> {
        let k = key.encode_key()?;

        let _guard = self.counter_lock.lock();
        let current = match self.get_raw(&k) {
            Ok(bytes) => codec::deserialize::<i64>(&bytes)?,
            Err(WharfError::KeyNotFound) => 0,
            Err(e) => return Err(e),
        };
        let next = current.saturating_add(delta);
        self.set_raw(&k, &codec::serialize(&next)?)?;
        self.stats.record_counter();
        Ok(next)
    }
}
