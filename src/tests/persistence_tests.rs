use std::io::Write;
use std::thread;
use std::time::Duration;

use tempfile::TempDir;

use crate::core::store::{StoreMode, WharfStore};
use crate::registry::Registry;

fn store_path(dir: &TempDir, name: &str) -> String {
    dir.path().join(name).to_str().unwrap().to_string()
}

#[test]
fn test_basic_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir, "roundtrip");

    {
        let registry = Registry::new();
        let db = registry.open(&path).unwrap();
        db.set(1u32, 1i64).unwrap();
        db.close().unwrap();
    }

    let registry = Registry::new();
    let db = registry.open(&path).unwrap();
    let value: i64 = db.get(1u32).unwrap();
    assert_eq!(value, 1);
}

#[test]
fn test_recovery_after_reopen() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir, "recovery");

    {
        let registry = Registry::new();
        let db = registry.open(&path).unwrap();
        for i in 0..100 {
            db.set(format!("key_{:03}", i), format!("value_{}", i))
                .unwrap();
        }
        db.close().unwrap();
    }

    let registry = Registry::new();
    let db = registry.open(&path).unwrap();
    assert_eq!(db.count(), 100);
    for i in 0..100 {
        let value: String = db.get(format!("key_{:03}", i)).unwrap();
        assert_eq!(value, format!("value_{}", i));
    }
    assert_eq!(db.stats().records_replayed, 100);
}

#[test]
fn test_delete_persistence() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir, "deletes");

    {
        let registry = Registry::new();
        let db = registry.open(&path).unwrap();
        db.set("del_key1", "value1").unwrap();
        db.set("del_key2", "value2").unwrap();
        db.set("keep_key", "keep_value").unwrap();
        db.delete("del_key1").unwrap();
        db.delete("del_key2").unwrap();
        db.close().unwrap();
    }

    let registry = Registry::new();
    let db = registry.open(&path).unwrap();
    assert!(!db.has("del_key1").unwrap());
    assert!(!db.has("del_key2").unwrap());
    assert!(db.has("keep_key").unwrap());
    assert_eq!(db.count(), 1);
}

#[test]
fn test_update_persistence() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir, "updates");

    {
        let registry = Registry::new();
        let db = registry.open(&path).unwrap();
        db.set("update_key", "value1").unwrap();
        db.set("update_key", "value2").unwrap();
        // Larger than the slot, forces an append
        db.set("update_key", "a_much_longer_final_value").unwrap();
        db.close().unwrap();
    }

    let registry = Registry::new();
    let db = registry.open(&path).unwrap();
    assert_eq!(db.count(), 1);
    let value: String = db.get("update_key").unwrap();
    assert_eq!(value, "a_much_longer_final_value");
}

#[test]
fn test_in_place_overwrite_keeps_files_flat() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir, "flat");

    let registry = Registry::new();
    let db = registry.open(&path).unwrap();

    db.set("slot", 0i64).unwrap();
    let size_after_first = db.file_size().unwrap();

    // Same-width payload reuses both the value slot and the log record
    for i in 1..50i64 {
        db.set("slot", i).unwrap();
    }
    assert_eq!(db.file_size().unwrap(), size_after_first);
    let value: i64 = db.get("slot").unwrap();
    assert_eq!(value, 49);
}

#[test]
fn test_log_record_rewrite_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir, "rewrite");

    {
        let registry = Registry::new();
        let db = registry.open(&path).unwrap();
        db.set("a", 1i64).unwrap();
        db.set("b", 2i64).unwrap();
        db.close().unwrap();
    }

    {
        // The recovered slot must carry the right record offset for the
        // in-place rewrite to land on a's record, not b's
        let registry = Registry::new();
        let db = registry.open(&path).unwrap();
        db.set("a", 9i64).unwrap();
        db.close().unwrap();
    }

    let registry = Registry::new();
    let db = registry.open(&path).unwrap();
    assert_eq!(db.count(), 2);
    assert_eq!(db.get::<_, i64>("a").unwrap(), 9);
    assert_eq!(db.get::<_, i64>("b").unwrap(), 2);
}

#[test]
fn test_reopen_preserves_count_and_order() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir, "order");

    let first_keys;
    {
        let registry = Registry::new();
        let db = registry.open(&path).unwrap();
        for i in [5, 3, 9, 1, 7] {
            db.set(format!("k{}", i), i as i64).unwrap();
        }
        first_keys = db.keys(None::<&str>, 0, 0, true).unwrap();
        db.close().unwrap();
    }

    let registry = Registry::new();
    let db = registry.open(&path).unwrap();
    assert_eq!(db.count(), 5);
    assert_eq!(db.keys(None::<&str>, 0, 0, true).unwrap(), first_keys);
}

#[test]
fn test_memory_first_with_path_persists() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir, "mirrored");

    {
        let registry = Registry::new();
        let db = WharfStore::builder()
            .store_mode(StoreMode::MemoryFirst)
            .open_in(&registry, &path)
            .unwrap();
        for i in 0..10 {
            db.set(i as u32, format!("v{}", i)).unwrap();
        }
        db.close().unwrap();
    }

    let registry = Registry::new();
    let db = WharfStore::builder()
        .store_mode(StoreMode::MemoryFirst)
        .open_in(&registry, &path)
        .unwrap();
    assert_eq!(db.count(), 10);
    let value: String = db.get(8u32).unwrap();
    assert_eq!(value, "v8");
}

#[test]
fn test_flush_and_file_size() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir, "flush");

    let registry = Registry::new();
    let db = registry.open(&path).unwrap();
    assert_eq!(db.file_size().unwrap(), 0);

    db.set("k", "v").unwrap();
    db.flush().unwrap();

    assert!(db.file_size().unwrap() > 0);
    assert!(db.stats().sync_count >= 1);
}

#[test]
fn test_background_syncer_ticks_and_stops() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir, "synced");

    let registry = Registry::new();
    let db = WharfStore::builder()
        .sync_interval_secs(1)
        .open_in(&registry, &path)
        .unwrap();

    db.set("k", "v").unwrap();
    thread::sleep(Duration::from_millis(1400));
    assert!(db.stats().sync_count >= 1);

    // Close cancels the syncer and must return promptly
    db.close().unwrap();
}

#[test]
fn test_truncated_log_tail_is_ignored() {
    let dir = TempDir::new().unwrap();
    let path = store_path(&dir, "truncated");

    {
        let registry = Registry::new();
        let db = registry.open(&path).unwrap();
        db.set("a", 1i64).unwrap();
        db.set("b", 2i64).unwrap();
        db.close().unwrap();
    }

    // Simulate a write cut short mid-record
    let mut log = std::fs::OpenOptions::new()
        .append(true)
        .open(format!("{}.idx", path))
        .unwrap();
    log.write_all(&[0, 0, 0, 9, 9]).unwrap();
    drop(log);

    let registry = Registry::new();
    let db = registry.open(&path).unwrap();
    assert_eq!(db.count(), 2);
    assert_eq!(db.get::<_, i64>("a").unwrap(), 1);
}
