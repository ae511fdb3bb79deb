use std::sync::atomic::Ordering;
use std::time::Instant;

use bytes::Bytes;

use crate::codec::{DecodeValue, EncodeKey, EncodeValue};
use crate::constants::MAX_KEY_SIZE;
use crate::core::index::Slot;
use crate::error::{Result, WharfError};
use crate::storage::format::{self, LogOp};
use crate::storage::FilePair;

use super::WharfStore;

impl WharfStore {
    /// Insert or update a key/value pair.
    ///
    /// A value that fits the key's previous slot is overwritten in place, so
    /// constant-size updates never grow the value file. The key's index log
    /// record is rewritten at its existing offset either way.
    ///
    /// # Errors
    ///
    /// * `InvalidKeySize` - encoded key longer than 65535 bytes
    /// * `EncodeFailed` - codec rejected the key or value
    /// * `IoError` - a file write failed; the in-memory state is unchanged
    ///
    /// # Example
    ///
    /// ```rust
    /// # use wharfdb::{StoreMode, WharfStore};
    /// # fn main() -> wharfdb::Result<()> {
    /// # let db = WharfStore::builder().store_mode(StoreMode::MemoryFirst).open("")?;
    /// db.set("user:42", "Ada")?;
    /// # db.close()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn set<K: EncodeKey, V: EncodeValue>(&self, key: K, value: V) -> Result<()> {
        let k = key.encode_key()?;
        let v = value.encode_value()?;
        self.set_raw(&k, &v)
    }

    pub(crate) fn set_raw(&self, key: &[u8], value: &[u8]) -> Result<()> {
        if key.len() > MAX_KEY_SIZE {
            return Err(WharfError::InvalidKeySize);
        }
        let value_size = u32::try_from(value.len()).map_err(|_| WharfError::StoreFull)?;

        let start = Instant::now();
        let mut guard = self.inner.write();
        guard.ensure_open()?;
        let inner = &mut *guard;

        let old = inner.index.slot(key).cloned();
        let is_update = old.is_some();

        let mut slot = match &mut inner.files {
            Some(files) => {
                let slot = write_entry(files, key, value, value_size, old.as_ref())?;
                self.stats.bytes_written.fetch_add(
                    (value.len() + format::record_size(key.len())) as u64,
                    Ordering::Relaxed,
                );
                slot
            }
            None => Slot {
                value_offset: 0,
                value_size,
                key_record_offset: 0,
                value: None,
            },
        };

        if self.memory_first() {
            slot.value = Some(Bytes::copy_from_slice(value));
        }

        if is_update {
            inner.index.update(key, slot);
        } else {
            inner.index.insert(key.to_vec(), slot);
        }

        self.stats
            .record_set(start.elapsed().as_nanos() as u64, is_update);
        Ok(())
    }

    /// Retrieve and decode the value stored at `key`.
    ///
    /// Raw byte sinks (`Vec<u8>`, `Bytes`) receive the stored bytes as-is;
    /// any other sink runs the generic decoder.
    ///
    /// # Errors
    ///
    /// * `KeyNotFound` - key does not exist
    /// * `DecodeFailed` - stored bytes do not match the requested shape
    /// * `IoError` - the value file read failed
    ///
    /// # Example
    ///
    /// ```rust
    /// # use wharfdb::{StoreMode, WharfStore};
    /// # fn main() -> wharfdb::Result<()> {
    /// # let db = WharfStore::builder().store_mode(StoreMode::MemoryFirst).open("")?;
    /// db.set("user:42", "Ada")?;
    /// let name: String = db.get("user:42")?;
    /// assert_eq!(name, "Ada");
    /// # db.close()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn get<K: EncodeKey, V: DecodeValue>(&self, key: K) -> Result<V> {
        let k = key.encode_key()?;
        let bytes = self.get_raw(&k)?;
        V::decode_value(&bytes)
    }

    pub(crate) fn get_raw(&self, key: &[u8]) -> Result<Vec<u8>> {
        let start = Instant::now();
        let inner = self.inner.read();
        inner.ensure_open()?;

        let slot = match inner.index.slot(key) {
            Some(slot) => slot,
            None => {
                self.stats.record_key_not_found();
                return Err(WharfError::KeyNotFound);
            }
        };

        let value = if let Some(bytes) = &slot.value {
            bytes.to_vec()
        } else {
            let files = inner.files.as_ref().ok_or(WharfError::StoreClosed)?;
            files
                .values
                .read_exact_at(slot.value_offset, slot.value_size)?
        };

        self.stats
            .bytes_read
            .fetch_add(value.len() as u64, Ordering::Relaxed);
        self.stats.record_get(start.elapsed().as_nanos() as u64);
        Ok(value)
    }

    /// Delete a key.
    ///
    /// The stale value bytes stay in the value file; no live slot references
    /// them again and there is no compaction.
    ///
    /// # Errors
    ///
    /// * `KeyNotFound` - key does not exist
    pub fn delete<K: EncodeKey>(&self, key: K) -> Result<()> {
        let k = key.encode_key()?;
        let start = Instant::now();
        let mut guard = self.inner.write();
        guard.ensure_open()?;
        let inner = &mut *guard;

        if !inner.index.contains(&k) {
            self.stats.record_key_not_found();
            return Err(WharfError::KeyNotFound);
        }

        if let Some(files) = &mut inner.files {
            let record = format::encode_record(LogOp::Delete, 0, 0, format::now_secs(), &k);
            files.log.append(&record)?;
            self.stats
                .bytes_written
                .fetch_add(record.len() as u64, Ordering::Relaxed);
        }

        inner.index.remove(&k);
        self.stats.record_delete(start.elapsed().as_nanos() as u64);
        Ok(())
    }
}

/// Value placement: a new key appends value and log record; an existing key
/// reuses its value slot when the new payload fits (else appends) and always
/// rewrites its log record in place, which cannot change the record footprint
/// because the key is unchanged.
fn write_entry(
    files: &mut FilePair,
    key: &[u8],
    value: &[u8],
    value_size: u32,
    old: Option<&Slot>,
) -> Result<Slot> {
    let timestamp = format::now_secs();
    match old {
        None => {
            let value_offset = files.values.append(value)?;
            let record = format::encode_record(LogOp::Put, value_offset, value_size, timestamp, key);
            let key_record_offset = files.log.append(&record)?;
            Ok(Slot {
                value_offset,
                value_size,
                key_record_offset,
                value: None,
            })
        }
        Some(old) => {
            let value_offset = if old.value_size >= value_size {
                files.values.write_at(old.value_offset, value)?;
                old.value_offset
            } else {
                files.values.append(value)?
            };
            let record = format::encode_record(LogOp::Put, value_offset, value_size, timestamp, key);
            files.log.rewrite_at(old.key_record_offset, &record)?;
            Ok(Slot {
                value_offset,
                value_size,
                key_record_offset: old.key_record_offset,
                value: None,
            })
        }
    }
}
