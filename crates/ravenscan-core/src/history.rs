use crate::models::HistoryEntry;
use ravenscan_cache::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Most entries the log ever holds
pub const HISTORY_CAPACITY: usize = 50;

const HISTORY_STORAGE_KEY: &str = "search-history";

/// What actually gets persisted: the entries plus the id counter, written
/// as one document so a capped log is all anyone can ever read back.
#[derive(Debug, Default, Serialize, Deserialize)]
struct HistoryLog {
    next_id: u64,
    entries: Vec<HistoryEntry>,
}

/// Bounded, most-recent-first log of successful searches
///
/// Every operation re-reads the persisted log, so positions passed to
/// `delete_at` refer to the current state, not to whatever the caller
/// rendered earlier. Prefer `delete(id)` where an id is at hand: ids are
/// stable, positions shift with every insert.
pub struct HistoryCache {
    store: Arc<dyn KeyValueStore>,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl HistoryCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Snapshot of the log, newest first
    pub fn list(&self) -> crate::Result<Vec<HistoryEntry>> {
        Ok(self.load()?.entries)
    }

    pub fn len(&self) -> crate::Result<usize> {
        Ok(self.load()?.entries.len())
    }

    pub fn is_empty(&self) -> crate::Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Look up an entry by id
    pub fn get(&self, id: u64) -> crate::Result<Option<HistoryEntry>> {
        Ok(self.load()?.entries.into_iter().find(|e| e.id == id))
    }

    /// Prepend `entry`, evicting the oldest entries beyond capacity
    ///
    /// The entry gets a fresh id; the stored version is returned.
    pub fn insert(&self, mut entry: HistoryEntry) -> crate::Result<HistoryEntry> {
        let _guard = self.lock()?;
        let mut log = self.load()?;

        log.next_id = log.next_id.max(1);
        entry.id = log.next_id;
        log.next_id += 1;

        log.entries.insert(0, entry.clone());
        if log.entries.len() > HISTORY_CAPACITY {
            let evicted = log.entries.len() - HISTORY_CAPACITY;
            log.entries.truncate(HISTORY_CAPACITY);
            debug!("Evicted {} old history entries", evicted);
        }

        self.save(&log)?;
        info!("Saved '{}' to history as #{}", entry.query, entry.id);
        Ok(entry)
    }

    /// Remove the entry currently at `index` (0 = newest)
    ///
    /// Out-of-range indexes are ignored.
    pub fn delete_at(&self, index: usize) -> crate::Result<Option<HistoryEntry>> {
        let _guard = self.lock()?;
        let mut log = self.load()?;

        if index >= log.entries.len() {
            debug!("delete_at({}) ignored, log has {} entries", index, log.entries.len());
            return Ok(None);
        }

        let removed = log.entries.remove(index);
        self.save(&log)?;
        Ok(Some(removed))
    }

    /// Remove the entry with `id`, returning whether it was there
    pub fn delete(&self, id: u64) -> crate::Result<bool> {
        let _guard = self.lock()?;
        let mut log = self.load()?;

        let before = log.entries.len();
        log.entries.retain(|e| e.id != id);
        if log.entries.len() == before {
            return Ok(false);
        }

        self.save(&log)?;
        Ok(true)
    }

    /// Drop every entry. Ids keep counting up afterwards.
    pub fn clear(&self) -> crate::Result<()> {
        let _guard = self.lock()?;
        let mut log = self.load()?;
        log.entries.clear();
        self.save(&log)
    }

    fn lock(&self) -> crate::Result<std::sync::MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| crate::Error::StorageError("history lock poisoned".into()))
    }

    fn load(&self) -> crate::Result<HistoryLog> {
        match self.store.get(HISTORY_STORAGE_KEY)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                crate::Error::StorageError(format!("Failed to parse search history: {}", e))
            }),
            None => Ok(HistoryLog::default()),
        }
    }

    fn save(&self, log: &HistoryLog) -> crate::Result<()> {
        let raw = serde_json::to_string(log).map_err(|e| {
            crate::Error::StorageError(format!("Failed to serialize search history: {}", e))
        })?;
        self.store.set(HISTORY_STORAGE_KEY, &raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        BrandCheckResult, DomainStatus, Query, SeoSummary, SocialStatus, WhoisRecord,
    };
    use ravenscan_cache::{CacheError, MemoryStore, SqliteStore};
    use std::collections::BTreeMap;

    fn entry(name: &str) -> HistoryEntry {
        HistoryEntry::new(
            Query::parse(name).unwrap(),
            BrandCheckResult {
                brand_name: Some(name.to_string()),
                ..Default::default()
            },
        )
    }

    fn cache() -> HistoryCache {
        HistoryCache::new(Arc::new(MemoryStore::new()))
    }

    fn queries(cache: &HistoryCache) -> Vec<String> {
        cache
            .list()
            .unwrap()
            .into_iter()
            .map(|e| e.query.to_string())
            .collect()
    }

    #[test]
    fn test_empty_log() {
        let cache = cache();
        assert!(cache.list().unwrap().is_empty());
        assert!(cache.is_empty().unwrap());
    }

    #[test]
    fn test_insert_goes_to_head() {
        let cache = cache();
        cache.insert(entry("first")).unwrap();
        let stored = cache.insert(entry("second")).unwrap();

        assert_eq!(cache.list().unwrap()[0], stored);
        assert_eq!(queries(&cache), vec!["second", "first"]);
    }

    #[test]
    fn test_capacity_never_exceeded() {
        let cache = cache();
        for i in 0..(HISTORY_CAPACITY + 15) {
            cache.insert(entry(&format!("name{}", i))).unwrap();
            assert!(cache.len().unwrap() <= HISTORY_CAPACITY);
        }
        assert_eq!(cache.len().unwrap(), HISTORY_CAPACITY);
    }

    #[test]
    fn test_51st_insert_evicts_oldest() {
        let cache = cache();
        for i in 0..HISTORY_CAPACITY {
            cache.insert(entry(&format!("name{}", i))).unwrap();
        }
        let tail_before = cache.list().unwrap().last().cloned().unwrap();
        assert_eq!(tail_before.query.as_str(), "name0");

        let newest = cache.insert(entry("overflow")).unwrap();
        let log = cache.list().unwrap();

        assert_eq!(log.len(), HISTORY_CAPACITY);
        assert_eq!(log[0], newest);
        assert!(log.iter().all(|e| e.id != tail_before.id));
        assert_eq!(log.last().unwrap().query.as_str(), "name1");
    }

    #[test]
    fn test_delete_at_preserves_order() {
        let cache = cache();
        for name in ["aaa", "bbb", "ccc", "ddd"] {
            cache.insert(entry(name)).unwrap();
        }
        // Log is now ddd, ccc, bbb, aaa
        let removed = cache.delete_at(1).unwrap().unwrap();

        assert_eq!(removed.query.as_str(), "ccc");
        assert_eq!(queries(&cache), vec!["ddd", "bbb", "aaa"]);
    }

    #[test]
    fn test_delete_at_out_of_range_is_noop() {
        let cache = cache();
        cache.insert(entry("aaa")).unwrap();

        assert_eq!(cache.delete_at(1).unwrap(), None);
        assert_eq!(cache.delete_at(usize::MAX).unwrap(), None);
        assert_eq!(cache.len().unwrap(), 1);
    }

    #[test]
    fn test_delete_at_uses_current_state() {
        let backing = Arc::new(MemoryStore::new());
        let tab_a = HistoryCache::new(backing.clone());
        let tab_b = HistoryCache::new(backing);

        tab_a.insert(entry("aaa")).unwrap();
        tab_a.insert(entry("bbb")).unwrap();
        let snapshot = tab_a.list().unwrap();
        assert_eq!(snapshot.len(), 2);

        // Another surface shrinks the log behind tab A's back
        tab_b.delete_at(0).unwrap();
        tab_b.delete_at(0).unwrap();

        // Index 1 from the stale snapshot no longer exists
        assert_eq!(tab_a.delete_at(1).unwrap(), None);
        assert!(tab_a.is_empty().unwrap());
    }

    #[test]
    fn test_delete_by_id() {
        let cache = cache();
        let a = cache.insert(entry("aaa")).unwrap();
        let b = cache.insert(entry("bbb")).unwrap();
        cache.insert(entry("ccc")).unwrap();

        assert!(cache.delete(a.id).unwrap());
        assert!(!cache.delete(a.id).unwrap());
        assert_eq!(queries(&cache), vec!["ccc", "bbb"]);
        assert_eq!(cache.get(b.id).unwrap().unwrap().query.as_str(), "bbb");
        assert_eq!(cache.get(a.id).unwrap(), None);
    }

    #[test]
    fn test_ids_are_never_reused() {
        let cache = cache();
        let first = cache.insert(entry("aaa")).unwrap();
        cache.clear().unwrap();
        let second = cache.insert(entry("bbb")).unwrap();

        assert!(first.id >= 1);
        assert!(second.id > first.id);
    }

    #[test]
    fn test_clear() {
        let cache = cache();
        cache.insert(entry("aaa")).unwrap();
        cache.insert(entry("bbb")).unwrap();
        cache.clear().unwrap();

        assert!(cache.list().unwrap().is_empty());
    }

    #[test]
    fn test_roundtrip_through_reopened_database() {
        let dir = tempfile::TempDir::new().unwrap();
        let db_path = dir.path().join("ravenscan.db");

        let result = BrandCheckResult {
            brand_name: Some("rav".to_string()),
            domains: Some(BTreeMap::from([
                ("rav.com".to_string(), DomainStatus::Taken),
                ("rav.io".to_string(), DomainStatus::Available),
            ])),
            whois: Some(BTreeMap::from([(
                "rav.com".to_string(),
                WhoisRecord {
                    expiration: Some("2030-01-01T00:00:00Z".to_string()),
                    registrar: Some("Example Registrar".to_string()),
                    error: None,
                },
            )])),
            socials: Some(BTreeMap::from([
                ("github".to_string(), SocialStatus::Taken),
                ("x".to_string(), SocialStatus::Unknown),
            ])),
            seo: Some(SeoSummary {
                hits: 42,
                top_results: vec!["https://rav.com".to_string()],
            }),
            suggestions: Some(vec!["ravhq".to_string(), "getrav".to_string()]),
        };

        let stored = {
            let store = Arc::new(SqliteStore::open(&db_path).unwrap());
            let cache = HistoryCache::new(store);
            cache
                .insert(HistoryEntry::new(Query::parse("rav").unwrap(), result))
                .unwrap()
        };

        let reopened = HistoryCache::new(Arc::new(SqliteStore::open(&db_path).unwrap()));
        let log = reopened.list().unwrap();

        assert_eq!(log.len(), 1);
        assert_eq!(log[0], stored);
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> ravenscan_cache::Result<Option<String>> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> ravenscan_cache::Result<()> {
            Err(CacheError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )))
        }

        fn delete(&self, _key: &str) -> ravenscan_cache::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_reported() {
        let cache = HistoryCache::new(Arc::new(BrokenStore));
        let err = cache.insert(entry("aaa")).unwrap_err();
        assert!(matches!(err, crate::Error::StorageError(_)));
    }

    #[test]
    fn test_corrupt_document_is_reported() {
        let backing = Arc::new(MemoryStore::new());
        backing.set(HISTORY_STORAGE_KEY, "{not json").unwrap();

        let cache = HistoryCache::new(backing);
        assert!(matches!(cache.list(), Err(crate::Error::StorageError(_))));
    }
}
