//! In-memory store implementation.
//!
//! Cache entries expire by TTL; persistent entries live for the process
//! lifetime. Interior mutability follows the in-memory repository shape:
//! `RwLock`-guarded maps behind a shared handle.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use super::errors::{StoreError, StoreResult};
use super::Store;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Process-local store backed by `RwLock`-guarded hash maps.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    cache: RwLock<HashMap<String, CacheEntry>>,
    data: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a persistent entry (interest lists live here).
    pub fn put(&self, key: impl Into<String>, value: impl Into<String>) {
        let mut data = self.data.write().unwrap_or_else(|e| e.into_inner());
        data.insert(key.into(), value.into());
    }
}

impl Store for InMemoryStore {
    fn cache_get(&self, key: &str) -> StoreResult<Option<String>> {
        let cache = self
            .cache
            .read()
            .map_err(|_| StoreError::Unavailable("cache lock poisoned".into()))?;
        let now = Instant::now();
        Ok(cache
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone()))
    }

    fn cache_set(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        let mut cache = self
            .cache
            .write()
            .map_err(|_| StoreError::Unavailable("cache lock poisoned".into()))?;
        cache.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let data = self
            .data
            .read()
            .map_err(|_| StoreError::Unavailable("data lock poisoned".into()))?;
        Ok(data.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_round_trip() {
        let store = InMemoryStore::new();
        store
            .cache_set("uid:abc", "3.5", Duration::from_secs(60))
            .unwrap();
        assert_eq!(store.cache_get("uid:abc").unwrap(), Some("3.5".to_string()));
    }

    #[test]
    fn test_cache_miss_on_absent_key() {
        let store = InMemoryStore::new();
        assert_eq!(store.cache_get("uid:missing").unwrap(), None);
    }

    #[test]
    fn test_cache_entry_expires() {
        let store = InMemoryStore::new();
        store.cache_set("uid:abc", "3.5", Duration::ZERO).unwrap();
        assert_eq!(store.cache_get("uid:abc").unwrap(), None);
    }

    #[test]
    fn test_cache_overwrite_refreshes_value() {
        let store = InMemoryStore::new();
        store
            .cache_set("uid:abc", "1.0", Duration::from_secs(60))
            .unwrap();
        store
            .cache_set("uid:abc", "2.0", Duration::from_secs(60))
            .unwrap();
        assert_eq!(store.cache_get("uid:abc").unwrap(), Some("2.0".to_string()));
    }

    #[test]
    fn test_persistent_read_is_separate_from_cache() {
        let store = InMemoryStore::new();
        store.put("i:1", r#"["books"]"#);
        assert_eq!(store.get("i:1").unwrap(), Some(r#"["books"]"#.to_string()));
        assert_eq!(store.cache_get("i:1").unwrap(), None);
    }

    #[test]
    fn test_persistent_read_absent_key() {
        let store = InMemoryStore::new();
        assert_eq!(store.get("i:404").unwrap(), None);
    }
}
