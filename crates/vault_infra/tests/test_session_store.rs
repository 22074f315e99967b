//! File-backed session store: persistence across reopen, corruption.

mod common;

use common::{ADDRESS, remove_if_exists, temp_store_path};
use vault_infra::session_store::{
    FileSessionStore, SESSION_ADDRESS_KEY, SessionStore, SessionStoreError, saved_address,
};

#[test]
fn test_missing_file_opens_empty() {
    let path = temp_store_path("missing");
    remove_if_exists(&path);
    let store = FileSessionStore::open(&path).unwrap();
    assert_eq!(saved_address(&store), None);
    assert!(!path.exists(), "open must not create the file");
}

#[test]
fn test_address_survives_reopen() {
    let path = temp_store_path("reopen");
    {
        let store = FileSessionStore::open(&path).unwrap();
        store.set(SESSION_ADDRESS_KEY, ADDRESS).unwrap();
    }
    let store = FileSessionStore::open(&path).unwrap();
    assert_eq!(saved_address(&store).map(|a| a.to_string()), Some(ADDRESS.to_string()));

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("arkadiko_stx_address"), "stored under the well-known key: {raw}");
    remove_if_exists(&path);
}

#[test]
fn test_remove_clears_persisted_address() {
    let path = temp_store_path("remove");
    let store = FileSessionStore::open(&path).unwrap();
    store.set(SESSION_ADDRESS_KEY, ADDRESS).unwrap();
    store.remove(SESSION_ADDRESS_KEY).unwrap();
    drop(store);

    let store = FileSessionStore::open(&path).unwrap();
    assert_eq!(store.get(SESSION_ADDRESS_KEY).unwrap(), None);
    remove_if_exists(&path);
}

#[test]
fn test_corrupt_file_is_reported() {
    let path = temp_store_path("corrupt");
    std::fs::write(&path, "[1, 2").unwrap();
    let err = FileSessionStore::open(&path).unwrap_err();
    assert!(matches!(err, SessionStoreError::Corrupt { .. }), "got {err:?}");
    remove_if_exists(&path);
}

#[test]
fn test_failed_write_leaves_memory_unchanged() {
    let path = temp_store_path("failed_write");
    let store = FileSessionStore::open(&path).unwrap();
    store.set(SESSION_ADDRESS_KEY, ADDRESS).unwrap();

    // A directory at the store path makes every write fail.
    remove_if_exists(&path);
    std::fs::create_dir_all(&path).unwrap();

    let err = store.remove(SESSION_ADDRESS_KEY).unwrap_err();
    assert!(matches!(err, SessionStoreError::Io { .. }), "got {err:?}");
    assert_eq!(
        store.get(SESSION_ADDRESS_KEY).unwrap().as_deref(),
        Some(ADDRESS)
    );

    assert!(store.set("other", "value").is_err());
    assert_eq!(store.get("other").unwrap(), None);

    std::fs::remove_dir(&path).unwrap();
}
