use std::sync::Arc;
use std::thread;

use tempfile::TempDir;

use crate::core::store::{StoreMode, WharfStore};
use crate::registry::Registry;

#[test]
fn test_concurrent_sets_then_gets() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("parallel").to_str().unwrap().to_string();

    let registry = Registry::new();
    let db = registry.open(&path).unwrap();

    let mut handles = vec![];
    for t in 0..10 {
        let db = Arc::clone(&db);
        handles.push(thread::spawn(move || {
            for i in 0..500 {
                let n = t * 500 + i;
                db.set(format!("Key:{}", n), format!("Val:{}", n)).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(db.count(), 5000);

    let mut handles = vec![];
    for t in 0..10 {
        let db = Arc::clone(&db);
        handles.push(thread::spawn(move || {
            for i in 0..500 {
                let n = t * 500 + i;
                let value: String = db.get(format!("Key:{}", n)).unwrap();
                assert_eq!(value, format!("Val:{}", n));
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_parallel_counter_increments_sum_exactly() {
    let registry = Registry::new();
    let db = WharfStore::builder()
        .store_mode(StoreMode::MemoryFirst)
        .open_in(&registry, "")
        .unwrap();

    let mut handles = vec![];
    for _ in 0..8 {
        let db = Arc::clone(&db);
        handles.push(thread::spawn(move || {
            for _ in 0..50 {
                db.counter("shared", 1).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(db.counter("shared", 0).unwrap(), 400);
}

#[test]
fn test_parallel_counter_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("counters").to_str().unwrap().to_string();

    let registry = Registry::new();
    let db = registry.open(&path).unwrap();

    let mut handles = vec![];
    for _ in 0..4 {
        let db = Arc::clone(&db);
        handles.push(thread::spawn(move || {
            for _ in 0..25 {
                db.counter("disk_counter", 1).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(db.counter("disk_counter", 0).unwrap(), 100);
}

#[test]
fn test_concurrent_mixed_operations() {
    let registry = Registry::new();
    let db = WharfStore::builder()
        .store_mode(StoreMode::MemoryFirst)
        .open_in(&registry, "")
        .unwrap();

    for i in 0..100 {
        db.set(format!("key_{}", i), "initial").unwrap();
    }

    let mut handles = vec![];

    // Readers
    for _ in 0..4 {
        let db = Arc::clone(&db);
        handles.push(thread::spawn(move || {
            for i in 0..100 {
                let _ = db.get::<_, String>(format!("key_{}", i));
            }
        }));
    }

    // Enumerators force re-sorts under the reader lock
    for _ in 0..2 {
        let db = Arc::clone(&db);
        handles.push(thread::spawn(move || {
            for _ in 0..20 {
                let _ = db.keys(None::<&str>, 10, 0, true);
                let _ = db.keys_by_prefix(b"key_", 10, 0, false);
            }
        }));
    }

    // Writers stay off the keys the deleters race for
    for t in 0..4 {
        let db = Arc::clone(&db);
        handles.push(thread::spawn(move || {
            for i in 0..90 {
                let _ = db.set(format!("key_{}", i), format!("updated_by_{}", t));
            }
        }));
    }

    // Deleters
    for _ in 0..2 {
        let db = Arc::clone(&db);
        handles.push(thread::spawn(move || {
            for i in 90..100 {
                let _ = db.delete(format!("key_{}", i));
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    // Deleted keys stay gone; the rest are intact
    assert_eq!(db.count(), 90);
}
