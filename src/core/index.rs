//! In-memory key index: a hash map from key bytes to slot descriptors plus a
//! lazily sorted key sequence for ordered enumeration.
//!
//! Mutations append to the sequence in O(1) and mark it dirty; the first
//! ordered query after a mutation re-sorts. The sequence sits behind its own
//! mutex so enumeration calls arriving under the store's shared reader lock
//! can still sort.

use std::collections::HashMap;

use ahash::RandomState;
use bytes::Bytes;
use parking_lot::Mutex;

use crate::error::{Result, WharfError};

/// Locates a key's value in the value file and the key's own record in the
/// index log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub value_offset: u32,
    pub value_size: u32,
    /// Offset of the log record currently representing this key; overwrites
    /// rewrite that record in place.
    pub key_record_offset: u32,
    /// In-memory copy of the value, present only in memory-first mode.
    pub value: Option<Bytes>,
}

pub struct KeyIndex {
    slots: HashMap<Vec<u8>, Slot, RandomState>,
    ordered: Mutex<OrderedKeys>,
}

#[derive(Default)]
struct OrderedKeys {
    keys: Vec<Vec<u8>>,
    sorted: bool,
}

impl OrderedKeys {
    fn ensure_sorted(&mut self) {
        if !self.sorted {
            self.keys.sort_unstable();
            self.sorted = true;
        }
    }

    /// Smallest index whose key is `>= probe`.
    fn lower_bound(&mut self, probe: &[u8]) -> usize {
        self.ensure_sorted();
        self.keys.partition_point(|k| k.as_slice() < probe)
    }

    fn push(&mut self, key: Vec<u8>) {
        self.keys.push(key);
        self.sorted = false;
    }

    fn remove(&mut self, key: &[u8]) {
        let i = self.lower_bound(key);
        if i < self.keys.len() && self.keys[i] == key {
            self.keys.remove(i);
        }
    }
}

impl KeyIndex {
    pub fn new() -> Self {
        Self {
            slots: HashMap::with_hasher(RandomState::new()),
            ordered: Mutex::new(OrderedKeys::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        self.slots.contains_key(key)
    }

    pub fn slot(&self, key: &[u8]) -> Option<&Slot> {
        self.slots.get(key)
    }

    pub fn is_sorted(&self) -> bool {
        self.ordered.lock().sorted
    }

    /// Insert a key the index does not hold yet.
    pub fn insert(&mut self, key: Vec<u8>, slot: Slot) {
        self.ordered.lock().push(key.clone());
        self.slots.insert(key, slot);
    }

    /// Replace the slot of an existing key; its position in the ordered
    /// sequence is unchanged.
    pub fn update(&mut self, key: &[u8], slot: Slot) {
        if let Some(existing) = self.slots.get_mut(key) {
            *existing = slot;
        }
    }

    pub fn remove(&mut self, key: &[u8]) -> Option<Slot> {
        let slot = self.slots.remove(key)?;
        self.ordered.lock().remove(key);
        Some(slot)
    }

    /// Smallest sorted index whose key is `>= probe`.
    pub fn sorted_position(&self, probe: &[u8]) -> usize {
        self.ordered.lock().lower_bound(probe)
    }

    /// Keys in lexicographic order. A supplied `from` must exist, positions
    /// the scan and is itself excluded; `limit == 0` means unbounded.
    pub fn keys(
        &self,
        from: Option<&[u8]>,
        limit: usize,
        offset: usize,
        asc: bool,
    ) -> Result<Vec<Vec<u8>>> {
        let mut ordered = self.ordered.lock();
        let len = ordered.keys.len();
        let (pivot, exclude_from) = match from {
            None => {
                ordered.ensure_sorted();
                (if asc { 0 } else { len as i64 - 1 }, 0)
            }
            Some(probe) => {
                let i = ordered.lower_bound(probe);
                if i >= len || ordered.keys[i] != probe {
                    return Err(WharfError::KeyNotFound);
                }
                (i as i64, 1)
            }
        };
        let (start, end) = scan_interval(pivot, limit, offset, exclude_from, len, asc);
        Ok(collect(&ordered.keys, start, end, asc, None))
    }

    /// Keys starting with `prefix`, in either direction. Fails with
    /// `KeyNotFound` when no key matches.
    pub fn keys_by_prefix(
        &self,
        prefix: &[u8],
        limit: usize,
        offset: usize,
        asc: bool,
    ) -> Result<Vec<Vec<u8>>> {
        let mut ordered = self.ordered.lock();
        let len = ordered.keys.len();
        let pivot: i64 = if asc {
            ordered.lower_bound(prefix) as i64
        } else {
            // Last matching key, located by a tail scan; the matching range
            // is contiguous once sorted.
            ordered.ensure_sorted();
            match ordered.keys.iter().rposition(|k| k.starts_with(prefix)) {
                Some(i) => i as i64,
                None => -1,
            }
        };
        if pivot < 0
            || pivot as usize >= len
            || !ordered.keys[pivot as usize].starts_with(prefix)
        {
            return Err(WharfError::KeyNotFound);
        }
        let (start, end) = scan_interval(pivot, limit, offset, 0, len, asc);
        Ok(collect(&ordered.keys, start, end, asc, Some(prefix)))
    }
}

impl Default for KeyIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Translate a pivot index plus `(limit, offset)` into inclusive scan bounds
/// for the chosen direction.
fn scan_interval(
    pivot: i64,
    limit: usize,
    offset: usize,
    exclude_from: usize,
    len: usize,
    asc: bool,
) -> (i64, i64) {
    let start;
    let mut end;
    if asc {
        start = pivot + (offset + exclude_from) as i64;
        end = if limit == 0 {
            len as i64 - 1
        } else {
            start + limit as i64 - 1
        };
    } else {
        start = pivot - (offset + exclude_from) as i64;
        end = if limit == 0 { 0 } else { start - limit as i64 + 1 };
    }
    if end < 0 {
        end = 0;
    }
    if end >= len as i64 {
        end = len as i64 - 1;
    }
    (start, end)
}

fn collect(
    keys: &[Vec<u8>],
    start: i64,
    end: i64,
    asc: bool,
    prefix: Option<&[u8]>,
) -> Vec<Vec<u8>> {
    let mut out = Vec::new();
    if start < 0 || start >= keys.len() as i64 {
        return out;
    }
    let matches = |k: &[u8]| prefix.map_or(true, |p| k.starts_with(p));
    if asc {
        let mut i = start;
        while i <= end {
            let key = &keys[i as usize];
            if !matches(key) {
                break;
            }
            out.push(key.clone());
            i += 1;
        }
    } else {
        let mut i = start;
        while i >= end {
            let key = &keys[i as usize];
            if !matches(key) {
                break;
            }
            out.push(key.clone());
            i -= 1;
        }
    }
    out
}
