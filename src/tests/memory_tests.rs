use tempfile::TempDir;

use crate::core::store::{StoreMode, WharfStore};
use crate::error::{Result, WharfError};
use crate::registry::Registry;

#[test]
fn test_pure_in_memory_lifecycle() {
    let registry = Registry::new();
    let db = WharfStore::builder()
        .store_mode(StoreMode::MemoryFirst)
        .open_in(&registry, "")
        .unwrap();

    for i in 0..10_000u32 {
        db.set(i, i).unwrap();
    }

    let value: u32 = db.get(8u32).unwrap();
    assert_eq!(value, 8);
    assert_eq!(db.count(), 10_000);

    // Dropping the store closes the unnamed universe; a fresh open is empty
    registry.delete_file("").unwrap();
    let db = WharfStore::builder()
        .store_mode(StoreMode::MemoryFirst)
        .open_in(&registry, "")
        .unwrap();
    let result: Result<u32> = db.get(8u32);
    assert!(matches!(result.unwrap_err(), WharfError::KeyNotFound));
    assert_eq!(db.count(), 0);
}

#[test]
fn test_in_memory_store_has_no_files() {
    let registry = Registry::new();
    let db = WharfStore::builder()
        .store_mode(StoreMode::MemoryFirst)
        .open_in(&registry, "")
        .unwrap();

    db.set("k", "v").unwrap();
    assert!(matches!(
        db.file_size().unwrap_err(),
        WharfError::InvalidPath
    ));

    db.delete("k").unwrap();
    db.close().unwrap();
}

#[test]
fn test_memory_first_serves_reads_from_ram() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mirror").to_str().unwrap().to_string();

    let registry = Registry::new();
    let db = WharfStore::builder()
        .store_mode(StoreMode::MemoryFirst)
        .open_in(&registry, &path)
        .unwrap();

    db.set("k", b"original".as_slice()).unwrap();

    // Clobber the value file behind the store's back; reads must keep coming
    // from the RAM mirror
    let size = std::fs::metadata(&path).unwrap().len() as usize;
    std::fs::write(&path, vec![0xFF; size]).unwrap();

    let value: Vec<u8> = db.get("k").unwrap();
    assert_eq!(value, b"original".to_vec());
}

#[test]
fn test_memory_first_overwrite_and_delete() {
    let registry = Registry::new();
    let db = WharfStore::builder()
        .store_mode(StoreMode::MemoryFirst)
        .open_in(&registry, "")
        .unwrap();

    db.set("k", "first").unwrap();
    db.set("k", "second").unwrap();
    assert_eq!(db.get::<_, String>("k").unwrap(), "second");
    assert_eq!(db.count(), 1);

    db.delete("k").unwrap();
    assert_eq!(db.count(), 0);
}
