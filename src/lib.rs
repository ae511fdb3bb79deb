//! # WharfDB - Embedded Key/Value Store
//!
// Copyright 2026 Wharfdb Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! WharfDB keeps the complete key set in memory while values live on disk at
//! well-known offsets. Writes are recorded in an append-only index log, so
//! recovering a store is a single forward scan of one file.
//!
//! ## Features
//!
//! - **Keys in memory, values on disk**: point lookups cost one hash probe
//!   plus one positional read
//! - **Append-only index log**: the `.idx` file is the sole source of
//!   structure; opening a store replays it front to back
//! - **In-place updates**: a value that fits its old slot is overwritten in
//!   place, and the key's log record is rewritten at its existing offset, so
//!   constant-size updates grow neither file
//! - **Ordered enumeration**: lazily sorted key sequence with range and
//!   prefix scans in both directions
//! - **Counters**: serialized read-modify-write increments of i64 values
//! - **Memory-first mode**: every live value mirrored in RAM; with an empty
//!   path the store never touches disk
//! - **Registry**: opening the same path twice yields the same handle;
//!   `close_all` and `backup_all` sweep every open store
//! - **Background syncer**: optional periodic fsync task per store,
//!   cancelled promptly on close
//!
//! ## Durability
//!
//! Durability is relaxed by design: writes reach the page cache immediately
//! and hit the platter on `flush`, on `close`, or on the background syncer's
//! tick. Crash-consistency beyond that, multi-process access, compaction and
//! transactions are out of scope.
//!
//! ## Quick Start
//!
//! ### In-memory store
//! ```rust
//! use wharfdb::{StoreMode, WharfStore};
//!
//! # fn main() -> wharfdb::Result<()> {
//! let db = WharfStore::builder()
//!     .store_mode(StoreMode::MemoryFirst)
//!     .open("")?;
//!
//! db.set("user:1", "Ada")?;
//! let name: String = db.get("user:1")?;
//! assert_eq!(name, "Ada");
//!
//! db.delete("user:1")?;
//! assert!(!db.has("user:1")?);
//! db.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Persistent store
//! ```no_run
//! # fn main() -> wharfdb::Result<()> {
//! let db = wharfdb::open("data/users")?;
//!
//! db.set(42u32, "Grace")?;
//! db.close()?;
//!
//! // Reopening replays the index log and finds the key again
//! let db = wharfdb::open("data/users")?;
//! let name: String = db.get(42u32)?;
//! assert_eq!(name, "Grace");
//! # Ok(())
//! # }
//! ```
//!
//! ### Ordered keys and prefix scans
//! ```rust
//! use wharfdb::{StoreMode, WharfStore};
//!
//! # fn main() -> wharfdb::Result<()> {
//! let db = WharfStore::builder()
//!     .store_mode(StoreMode::MemoryFirst)
//!     .open("")?;
//!
//! db.set("user:1", "Ada")?;
//! db.set("user:2", "Grace")?;
//! db.set("item:1", "anvil")?;
//!
//! // All keys, ascending
//! let all = db.keys(None::<&str>, 0, 0, true)?;
//! assert_eq!(all.len(), 3);
//!
//! // Keys under a prefix; a trailing '*' works too: db.keys(Some("user:*"), ..)
//! let users = db.keys_by_prefix(b"user:", 0, 0, true)?;
//! assert_eq!(users, vec![b"user:1".to_vec(), b"user:2".to_vec()]);
//! db.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Counters
//! ```rust
//! use wharfdb::{StoreMode, WharfStore};
//!
//! # fn main() -> wharfdb::Result<()> {
//! let db = WharfStore::builder()
//!     .store_mode(StoreMode::MemoryFirst)
//!     .open("")?;
//!
//! db.counter("visits", 1)?;
//! db.counter("visits", 5)?;
//! let total = db.counter("visits", 0)?;
//! assert_eq!(total, 6);
//! db.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Keys and values
//!
//! Keys encode through [`EncodeKey`]: byte slices and strings pass through
//! unchanged, integers become big-endian fixed-width bytes so byte order
//! matches numeric order, and anything serde-serializable goes through the
//! [`Serialized`] adapter. Values encode through [`EncodeValue`] (raw bytes
//! pass through, everything else uses the generic serializer) and decode
//! through [`DecodeValue`].
//!
//! ## Thread Safety
//!
//! A store multiplexes one writer with many parallel readers behind a
//! reader-writer lock; every method takes `&self`:
//!
//! ```rust
//! # use std::thread;
//! # use wharfdb::{StoreMode, WharfStore};
//! # fn main() -> wharfdb::Result<()> {
//! let db = WharfStore::builder()
//!     .store_mode(StoreMode::MemoryFirst)
//!     .open("")?;
//!
//! thread::scope(|s| {
//!     for i in 0..4 {
//!         let db = &db;
//!         s.spawn(move || {
//!             db.set(format!("key_{i}"), format!("val_{i}")).unwrap();
//!         });
//!     }
//! });
//!
//! assert_eq!(db.count(), 4);
//! db.close()?;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod constants;
pub mod core;
pub mod error;
pub mod registry;
pub mod stats;
pub mod storage;

pub use codec::{DecodeValue, EncodeKey, EncodeValue, Serialized};
pub use core::store::{StoreBuilder, StoreConfig, StoreMode, WharfStore};
pub use error::{Result, WharfError};
pub use registry::{
    backup_all, close, close_all, count, counter, default_registry, delete, delete_file, get, has,
    keys, open, open_with, set, Registry,
};
pub use stats::{Statistics, StatsSnapshot};

#[cfg(test)]
mod tests;
