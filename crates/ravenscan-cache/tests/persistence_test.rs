use ravenscan_cache::{KeyValueStore, SqliteStore};
use tempfile::TempDir;

#[test]
fn test_values_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("ravenscan.db");

    {
        let store = SqliteStore::open(&db_path).unwrap();
        store.set("ravenscan-api-key", "abc123").unwrap();
        store.set("theme", "dark").unwrap();
    }

    let reopened = SqliteStore::open(&db_path).unwrap();
    assert_eq!(
        reopened.get("ravenscan-api-key").unwrap(),
        Some("abc123".to_string())
    );
    assert_eq!(reopened.get("theme").unwrap(), Some("dark".to_string()));
}

#[test]
fn test_open_creates_missing_directories() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("nested").join("data").join("ravenscan.db");

    let store = SqliteStore::open(&db_path).unwrap();
    store.set("k", "v").unwrap();

    assert!(db_path.exists());
}

#[test]
fn test_delete_persists() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("ravenscan.db");

    {
        let store = SqliteStore::open(&db_path).unwrap();
        store.set("search-history", "[]").unwrap();
        store.delete("search-history").unwrap();
    }

    let reopened = SqliteStore::open(&db_path).unwrap();
    assert_eq!(reopened.get("search-history").unwrap(), None);
}
