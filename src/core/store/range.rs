use crate::codec::EncodeKey;
use crate::error::Result;

use super::WharfStore;

impl WharfStore {
    /// Keys in ascending (`asc = true`) or descending order.
    ///
    /// `from` positions the scan and is itself excluded; it must exist or the
    /// call fails with `KeyNotFound`. `limit == 0` returns everything after
    /// `offset` skipped entries. A byte or string `from` ending in `'*'`
    /// redirects to [`keys_by_prefix`](Self::keys_by_prefix) with the `'*'`
    /// stripped.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use wharfdb::{StoreMode, WharfStore};
    /// # fn main() -> wharfdb::Result<()> {
    /// # let db = WharfStore::builder().store_mode(StoreMode::MemoryFirst).open("")?;
    /// db.set("ab", 1i64)?;
    /// db.set("ac", 2i64)?;
    /// db.set("ba", 3i64)?;
    /// let keys = db.keys(None::<&str>, 0, 0, true)?;
    /// assert_eq!(keys, vec![b"ab".to_vec(), b"ac".to_vec(), b"ba".to_vec()]);
    /// let prefixed = db.keys(Some("a*"), 0, 0, true)?;
    /// assert_eq!(prefixed.len(), 2);
    /// # db.close()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn keys<K: EncodeKey>(
        &self,
        from: Option<K>,
        limit: usize,
        offset: usize,
        asc: bool,
    ) -> Result<Vec<Vec<u8>>> {
        let from = match from {
            Some(key) => Some((key.encode_key()?, key.wildcard())),
            None => None,
        };
        if let Some((k, true)) = &from {
            if k.len() > 1 && k.ends_with(b"*") {
                return self.keys_by_prefix(&k[..k.len() - 1], limit, offset, asc);
            }
        }

        let inner = self.inner.read();
        inner.ensure_open()?;
        self.stats.record_key_scan();
        inner
            .index
            .keys(from.as_ref().map(|(k, _)| k.as_slice()), limit, offset, asc)
    }

    /// All keys starting with `prefix`, in either direction.
    ///
    /// Fails with `KeyNotFound` when nothing matches.
    pub fn keys_by_prefix(
        &self,
        prefix: &[u8],
        limit: usize,
        offset: usize,
        asc: bool,
    ) -> Result<Vec<Vec<u8>>> {
        let inner = self.inner.read();
        inner.ensure_open()?;
        self.stats.record_key_scan();
        inner.index.keys_by_prefix(prefix, limit, offset, asc)
    }
}
