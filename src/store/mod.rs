//! Store adapters: minimal key-value capability contracts.

use crate::error::Result;

pub mod inmemory;
#[cfg(feature = "redis")]
pub mod redis;

pub use inmemory::MemoryStore;
#[cfg(feature = "redis")]
pub use redis::{PoolStats, RedisConfig, RedisStore};

/// Trait for store adapters.
///
/// This is the narrow contract the facade requires of a backend: reads
/// that distinguish a value from absence, writes with and without an
/// expiration, and deletion. Everything else is an optional capability
/// with a documented fallback (or none, for counters).
///
/// **IMPORTANT:** All methods use `&self` instead of `&mut self` to allow
/// concurrent access. Implementations should use interior mutability
/// (DashMap, connection pools, or external storage).
///
/// **ASYNC:** All methods are async and must be awaited. Every call
/// returns a result or an error; the facade never polls.
#[allow(async_fn_in_trait)]
pub trait Store: Send + Sync + Clone {
    /// Retrieve value by key.
    ///
    /// # Returns
    /// - `Ok(Some(bytes))` - Value found
    /// - `Ok(None)` - Absent: no entry for this key
    ///
    /// Idempotent, no side effects on the entry.
    ///
    /// # Errors
    /// Returns `Err` on backend failure (connection lost, etc.). Backend
    /// failures are never reported as `Ok(None)`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store value, overwriting any existing entry, expiring
    /// `ttl_seconds` from now.
    ///
    /// # Errors
    /// Returns `Err` on backend failure.
    async fn put(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) -> Result<()>;

    /// Store value with no expiration, overwriting any existing entry.
    ///
    /// # Errors
    /// Returns `Err` on backend failure.
    async fn forever(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Remove the entry if present.
    ///
    /// # Returns
    /// `Ok(true)` if an entry was removed, `Ok(false)` if the key was
    /// already absent. Absence is not an error.
    ///
    /// # Errors
    /// Returns `Err` on backend failure.
    async fn forget(&self, key: &str) -> Result<bool>;

    /// Batch read (optional capability).
    ///
    /// Default implementation issues one `get` per key, in the order
    /// given. Override for batch efficiency (e.g., Redis MGET). The
    /// result is index-aligned with `keys`.
    ///
    /// # Errors
    /// Returns `Err` on backend failure.
    async fn many(&self, keys: &[&str]) -> Result<Vec<Option<Vec<u8>>>> {
        let mut results = Vec::with_capacity(keys.len());
        for key in keys {
            results.push(self.get(key).await?);
        }
        Ok(results)
    }

    /// True if this store has a race-free conditional write (optional
    /// capability flag).
    ///
    /// When `false`, the facade's `add` falls back to check-then-act,
    /// which is not race-free across concurrent writers.
    fn supports_atomic_add(&self) -> bool {
        false
    }

    /// Atomic set-if-not-exists (optional capability).
    ///
    /// # Returns
    /// `Ok(true)` iff the value was newly stored. Must be race-free when
    /// `supports_atomic_add` is true.
    ///
    /// # Errors
    /// Returns `Err(Error::NotSupported)` by default.
    async fn add(&self, key: &str, _value: Vec<u8>, _ttl_seconds: u64) -> Result<bool> {
        Err(crate::error::Error::NotSupported(format!(
            "atomic add is not supported by this store (key: {})",
            key
        )))
    }

    /// Atomic counter increment (optional capability).
    ///
    /// An absent key counts from zero. The facade delegates here with no
    /// client-side arithmetic fallback.
    ///
    /// # Errors
    /// Returns `Err(Error::NotSupported)` by default.
    async fn increment(&self, key: &str, _delta: i64) -> Result<i64> {
        Err(crate::error::Error::NotSupported(format!(
            "atomic counters are not supported by this store (key: {})",
            key
        )))
    }

    /// Atomic counter decrement (optional capability).
    ///
    /// # Errors
    /// Returns `Err(Error::NotSupported)` by default.
    async fn decrement(&self, key: &str, _delta: i64) -> Result<i64> {
        Err(crate::error::Error::NotSupported(format!(
            "atomic counters are not supported by this store (key: {})",
            key
        )))
    }

    /// Health check - verify the store is accessible.
    ///
    /// # Errors
    /// Returns `Err` if the store is not accessible.
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    /// Remove every entry (use with caution).
    ///
    /// # Errors
    /// Returns `Err` if the operation is not implemented or fails.
    async fn flush(&self) -> Result<()> {
        Err(crate::error::Error::NotSupported(
            "flush not implemented for this store".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    // Minimal store exercising the trait defaults.
    #[derive(Clone)]
    struct NullStore;

    impl Store for NullStore {
        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
            Ok(None)
        }
        async fn put(&self, _key: &str, _value: Vec<u8>, _ttl_seconds: u64) -> Result<()> {
            Ok(())
        }
        async fn forever(&self, _key: &str, _value: Vec<u8>) -> Result<()> {
            Ok(())
        }
        async fn forget(&self, _key: &str) -> Result<bool> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn test_many_default_emulates_per_key() {
        let store = NullStore;
        let results = store.many(&["a", "b", "c"]).await.expect("Failed to many");
        assert_eq!(results, vec![None, None, None]);
    }

    #[tokio::test]
    async fn test_optional_capabilities_default_to_not_supported() {
        let store = NullStore;
        assert!(!store.supports_atomic_add());
        assert!(matches!(
            store.add("k", vec![1], 60).await,
            Err(Error::NotSupported(_))
        ));
        assert!(matches!(
            store.increment("k", 1).await,
            Err(Error::NotSupported(_))
        ));
        assert!(matches!(
            store.decrement("k", 1).await,
            Err(Error::NotSupported(_))
        ));
        assert!(matches!(store.flush().await, Err(Error::NotSupported(_))));
    }

    #[tokio::test]
    async fn test_memory_store_satisfies_contract() {
        let store = MemoryStore::new();
        store
            .put("key", vec![1, 2, 3], 60)
            .await
            .expect("Failed to put");
        assert_eq!(
            store.get("key").await.expect("Failed to get"),
            Some(vec![1, 2, 3])
        );
        assert!(store.forget("key").await.expect("Failed to forget"));
        assert!(!store.forget("key").await.expect("Failed to forget"));
    }
}
