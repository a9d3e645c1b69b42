//! In-memory store adapter (default, thread-safe, async).
//!
//! Uses DashMap for lock-free concurrent access with per-key sharding.
//! Automatically handles TTL expiration on access. Implements every
//! optional capability, including race-free conditional adds and atomic
//! counters, via the DashMap entry API.

use super::Store;
use crate::error::{Error, Result};
use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// In-memory cache entry with optional expiration.
struct CacheEntry {
    data: Vec<u8>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(data: Vec<u8>, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|d| Instant::now() + d);
        CacheEntry { data, expires_at }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() > exp)
    }
}

/// Thread-safe async in-memory store.
///
/// Uses DashMap for lock-free concurrent access with fine-grained per-key
/// sharding. No async locks required - operations are non-blocking.
///
/// # Example
///
/// ```no_run
/// use cache_facade::store::{MemoryStore, Store};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryStore::new();
///
///     // Store data with a 5-minute TTL
///     store.put("key1", b"value".to_vec(), 300).await?;
///
///     // Retrieve data
///     let value = store.get("key1").await?;
///     assert!(value.is_some());
///
///     // Store without expiration
///     store.forever("key2", b"pinned".to_vec()).await?;
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, CacheEntry>>,
}

impl MemoryStore {
    /// Create a new in-memory store.
    pub fn new() -> Self {
        MemoryStore {
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Get the current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get memory statistics.
    pub fn stats(&self) -> MemoryStats {
        let total_bytes: usize = self.entries.iter().map(|entry| entry.data.len()).sum();
        let expired_count = self
            .entries
            .iter()
            .filter(|entry| entry.is_expired())
            .count();

        MemoryStats {
            total_entries: self.entries.len(),
            expired_entries: expired_count,
            total_bytes,
        }
    }

    fn parse_counter(data: &[u8]) -> Result<i64> {
        std::str::from_utf8(data)
            .ok()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .ok_or_else(|| Error::BackendError("value is not an integer".to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired() {
                debug!("✓ Memory GET {} -> HIT", key);
                return Ok(Some(entry.data.clone()));
            }
        }

        // Drop the entry only if it sat there expired
        self.entries.remove_if(key, |_, entry| entry.is_expired());
        debug!("✓ Memory GET {} -> MISS", key);
        Ok(None)
    }

    async fn put(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) -> Result<()> {
        let entry = CacheEntry::new(value, Some(Duration::from_secs(ttl_seconds)));
        self.entries.insert(key.to_string(), entry);
        debug!("✓ Memory PUT {} (TTL: {}s)", key, ttl_seconds);
        Ok(())
    }

    async fn forever(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let entry = CacheEntry::new(value, None);
        self.entries.insert(key.to_string(), entry);
        debug!("✓ Memory PUT {} (forever)", key);
        Ok(())
    }

    async fn forget(&self, key: &str) -> Result<bool> {
        let removed = self
            .entries
            .remove(key)
            .map(|(_, entry)| !entry.is_expired())
            .unwrap_or(false);
        debug!("✓ Memory FORGET {} -> {}", key, removed);
        Ok(removed)
    }

    async fn many(&self, keys: &[&str]) -> Result<Vec<Option<Vec<u8>>>> {
        let results: Vec<Option<Vec<u8>>> = keys
            .iter()
            .map(|k| {
                self.entries
                    .get(*k)
                    .filter(|entry| !entry.is_expired())
                    .map(|entry| entry.data.clone())
            })
            .collect();

        debug!("✓ Memory MANY {} keys", keys.len());
        Ok(results)
    }

    fn supports_atomic_add(&self) -> bool {
        true
    }

    async fn add(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) -> Result<bool> {
        // The entry lock makes the check-and-insert a single step
        let added = match self.entries.entry(key.to_string()) {
            MapEntry::Occupied(mut occupied) => {
                if occupied.get().is_expired() {
                    occupied.insert(CacheEntry::new(
                        value,
                        Some(Duration::from_secs(ttl_seconds)),
                    ));
                    true
                } else {
                    false
                }
            }
            MapEntry::Vacant(vacant) => {
                vacant.insert(CacheEntry::new(
                    value,
                    Some(Duration::from_secs(ttl_seconds)),
                ));
                true
            }
        };

        debug!("✓ Memory ADD {} -> {}", key, added);
        Ok(added)
    }

    async fn increment(&self, key: &str, delta: i64) -> Result<i64> {
        // Absent or expired counters start from zero, like Redis INCRBY.
        // The existing TTL is preserved on update.
        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| CacheEntry::new(b"0".to_vec(), None));

        if entry.is_expired() {
            *entry = CacheEntry::new(b"0".to_vec(), None);
        }

        let current = Self::parse_counter(&entry.data)?;
        let next = current
            .checked_add(delta)
            .ok_or_else(|| Error::BackendError("counter overflow".to_string()))?;
        entry.data = next.to_string().into_bytes();

        debug!("✓ Memory INCR {} by {} -> {}", key, delta, next);
        Ok(next)
    }

    async fn decrement(&self, key: &str, delta: i64) -> Result<i64> {
        let negated = delta
            .checked_neg()
            .ok_or_else(|| Error::BackendError("counter overflow".to_string()))?;
        self.increment(key, negated).await
    }

    async fn health_check(&self) -> Result<bool> {
        // In-memory store is always healthy
        Ok(true)
    }

    async fn flush(&self) -> Result<()> {
        self.entries.clear();
        warn!("⚠ Memory FLUSH executed - all entries cleared!");
        Ok(())
    }
}

/// Store statistics.
#[derive(Clone, Debug)]
pub struct MemoryStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub total_bytes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_put_get() {
        let store = MemoryStore::new();

        store
            .put("key1", b"value1".to_vec(), 60)
            .await
            .expect("Failed to put");

        let result = store.get("key1").await.expect("Failed to get");
        assert_eq!(result, Some(b"value1".to_vec()));
    }

    #[tokio::test]
    async fn test_memory_store_miss() {
        let store = MemoryStore::new();

        let result = store.get("nonexistent").await.expect("Failed to get");
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_memory_store_forget() {
        let store = MemoryStore::new();

        store
            .put("key1", b"value1".to_vec(), 60)
            .await
            .expect("Failed to put");

        assert!(store.forget("key1").await.expect("Failed to forget"));
        assert_eq!(store.get("key1").await.expect("Failed to get"), None);

        // Second delete reports that nothing was removed
        assert!(!store.forget("key1").await.expect("Failed to forget"));
    }

    #[tokio::test]
    async fn test_memory_store_ttl_expiration() {
        let store = MemoryStore::new();

        store
            .put("key1", b"value1".to_vec(), 1)
            .await
            .expect("Failed to put");

        // Should be present immediately
        assert!(store.get("key1").await.expect("Failed to get").is_some());

        // Wait for expiration
        tokio::time::sleep(Duration::from_millis(1100)).await;

        // Should be expired now
        assert!(store.get("key1").await.expect("Failed to get").is_none());
    }

    #[tokio::test]
    async fn test_memory_store_forever_survives() {
        let store = MemoryStore::new();

        store
            .forever("pinned", b"value".to_vec())
            .await
            .expect("Failed to put forever");
        store
            .put("fleeting", b"value".to_vec(), 1)
            .await
            .expect("Failed to put");

        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert!(store.get("pinned").await.expect("Failed to get").is_some());
        assert!(store.get("fleeting").await.expect("Failed to get").is_none());
    }

    #[tokio::test]
    async fn test_memory_store_many() {
        let store = MemoryStore::new();

        store
            .put("key1", b"value1".to_vec(), 60)
            .await
            .expect("Failed to put");
        store
            .put("key2", b"value2".to_vec(), 60)
            .await
            .expect("Failed to put");

        let results = store
            .many(&["key1", "key2", "key3"])
            .await
            .expect("Failed to many");

        assert_eq!(results.len(), 3);
        assert_eq!(results[0], Some(b"value1".to_vec()));
        assert_eq!(results[1], Some(b"value2".to_vec()));
        assert_eq!(results[2], None);
    }

    #[tokio::test]
    async fn test_memory_store_add_only_when_absent() {
        let store = MemoryStore::new();
        assert!(store.supports_atomic_add());

        assert!(store
            .add("key", b"first".to_vec(), 60)
            .await
            .expect("Failed to add"));
        assert!(!store
            .add("key", b"second".to_vec(), 60)
            .await
            .expect("Failed to add"));

        let result = store.get("key").await.expect("Failed to get");
        assert_eq!(result, Some(b"first".to_vec()));
    }

    #[tokio::test]
    async fn test_memory_store_add_replaces_expired_entry() {
        let store = MemoryStore::new();

        store
            .put("key", b"old".to_vec(), 1)
            .await
            .expect("Failed to put");
        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert!(store
            .add("key", b"new".to_vec(), 60)
            .await
            .expect("Failed to add"));
        assert_eq!(
            store.get("key").await.expect("Failed to get"),
            Some(b"new".to_vec())
        );
    }

    #[tokio::test]
    async fn test_memory_store_increment_from_absent() {
        let store = MemoryStore::new();

        assert_eq!(
            store.increment("counter", 1).await.expect("Failed to incr"),
            1
        );
        assert_eq!(
            store.increment("counter", 4).await.expect("Failed to incr"),
            5
        );
        assert_eq!(
            store.decrement("counter", 2).await.expect("Failed to decr"),
            3
        );
    }

    #[tokio::test]
    async fn test_memory_store_increment_non_integer_fails() {
        let store = MemoryStore::new();

        store
            .put("key", b"\"text\"".to_vec(), 60)
            .await
            .expect("Failed to put");

        let result = store.increment("key", 1).await;
        assert!(matches!(result, Err(Error::BackendError(_))));
    }

    #[tokio::test]
    async fn test_memory_store_flush() {
        let store = MemoryStore::new();

        store
            .put("key1", b"value1".to_vec(), 60)
            .await
            .expect("Failed to put");
        store
            .put("key2", b"value2".to_vec(), 60)
            .await
            .expect("Failed to put");

        assert_eq!(store.len(), 2);

        store.flush().await.expect("Failed to flush");

        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_memory_store_stats() {
        let store = MemoryStore::new();

        store
            .put("key1", b"value_with_data".to_vec(), 60)
            .await
            .expect("Failed to put");
        store
            .put("key2", b"data".to_vec(), 60)
            .await
            .expect("Failed to put");

        let stats = store.stats();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.expired_entries, 0);
        assert!(stats.total_bytes > 0);
    }

    #[tokio::test]
    async fn test_memory_store_clone_shares_entries() {
        let store1 = MemoryStore::new();
        store1
            .put("key", b"value".to_vec(), 60)
            .await
            .expect("Failed to put");

        let store2 = store1.clone();

        let value = store2.get("key").await.expect("Failed to get");
        assert_eq!(value, Some(b"value".to_vec()));
    }

    #[tokio::test]
    async fn test_memory_store_concurrent_adds_single_winner() {
        let store = MemoryStore::new();
        let mut handles = vec![];

        for i in 0..10 {
            let s = store.clone();
            handles.push(tokio::spawn(async move {
                s.add("contended", format!("writer_{}", i).into_bytes(), 60)
                    .await
                    .expect("Failed to add")
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.expect("Task failed") {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
    }
}
