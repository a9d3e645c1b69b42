//! Cache repository - the facade over a store adapter.
//!
//! [`Repository`] translates every public call into one or more [`Store`]
//! calls, interprets the store's `Ok(None)` as the Absent marker, and
//! applies policy (default-value substitution, event firing, expiry
//! normalization) before returning to the caller.
//!
//! # Absent marker
//!
//! The store's `Ok(None)` on read is the one and only "no entry" signal.
//! The facade never inspects payload contents to second-guess it, so a
//! stored value whose decoded form means "nothing" (for example
//! `Option::None` serialized as `null`) still counts as a hit, while a
//! missing key counts as a miss even if a caller would treat both the
//! same. This is a contract constraint, not a bug.
//!
//! # Consistency
//!
//! `remember`/`remember_forever` and the non-atomic `add` fallback contain
//! a read-then-maybe-write window with no cross-call locking: concurrent
//! callers racing on the same key may both compute and both write, with
//! the last write winning. Stores reporting `supports_atomic_add` keep
//! `add` race-free; counters are always delegated to the store's atomic
//! primitive and never emulated.

use crate::error::{Error, Result};
use crate::events::{CacheEvents, NoOpEvents};
use crate::expiry::Expiry;
use crate::store::Store;
use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;

/// Default cache time for index-style writes, in minutes.
const DEFAULT_CACHE_MINUTES: f64 = 60.0;

/// Cache facade over a store adapter.
///
/// Holds the store for its entire lifetime and owns no entries; the store
/// is the sole owner of cached data. Per-instance state is limited to the
/// event sink, the optional key prefix, and the mutable default cache
/// time.
///
/// # Example
///
/// ```no_run
/// use cache_facade::{Expiry, MemoryStore, Repository};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let cache = Repository::new(MemoryStore::new());
///
///     cache.put("user:1", &"Ada", Expiry::Minutes(10.0)).await?;
///     let name: Option<String> = cache.get("user:1").await?;
///     assert_eq!(name.as_deref(), Some("Ada"));
///
///     Ok(())
/// }
/// ```
pub struct Repository<S: Store> {
    store: S,
    events: Box<dyn CacheEvents>,
    prefix: Option<String>,
    default_minutes: f64,
}

impl<S: Store> Repository<S> {
    /// Create a new repository over the given store.
    pub fn new(store: S) -> Self {
        Repository {
            store,
            events: Box::new(NoOpEvents),
            prefix: None,
            default_minutes: DEFAULT_CACHE_MINUTES,
        }
    }

    /// Set a custom event sink.
    pub fn with_events(mut self, events: Box<dyn CacheEvents>) -> Self {
        self.events = events;
        self
    }

    /// Namespace every physical key under `prefix`.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the default cache time (minutes) used by [`Repository::insert`].
    pub fn with_default_cache_time(mut self, minutes: f64) -> Self {
        self.default_minutes = minutes;
        self
    }

    /// Current default cache time in minutes.
    pub fn default_cache_time(&self) -> f64 {
        self.default_minutes
    }

    /// Change the default cache time in minutes.
    pub fn set_default_cache_time(&mut self, minutes: f64) {
        self.default_minutes = minutes;
    }

    /// Get store reference (for advanced use).
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Translate a logical key into the physical store key.
    ///
    /// Identity by default; prefixed repositories join with `:`. Keys must
    /// never be empty.
    pub fn item_key(&self, key: &str) -> String {
        debug_assert!(!key.is_empty(), "cache keys must not be empty");
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }

    /// Retrieve a value by key.
    ///
    /// Fires a hit or miss event exactly once; the hit fires only once
    /// the entry has decoded, so event accounting matches what the
    /// caller receives. `Ok(None)` is a miss; backend failures propagate
    /// as errors, never as misses.
    ///
    /// # Errors
    ///
    /// - `Error::BackendError`: the store is unavailable
    /// - `Error::DeserializationError`: the entry does not decode as `T`
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let full = self.item_key(key);
        match self.store.get(&full).await? {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes)?;
                self.events.cache_hit(&full);
                Ok(Some(value))
            }
            None => {
                self.events.cache_missed(&full);
                Ok(None)
            }
        }
    }

    /// Retrieve a value, substituting `default` on a miss.
    pub async fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T> {
        Ok(self.get(key).await?.unwrap_or(default))
    }

    /// Retrieve a value, lazily computing the default on a miss.
    ///
    /// `default` is only invoked when the key is absent.
    pub async fn get_or_else<T, F>(&self, key: &str, default: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        match self.get(key).await? {
            Some(value) => Ok(value),
            None => Ok(default()),
        }
    }

    /// True iff an entry exists for `key`.
    ///
    /// Checks raw existence in the store: no default substitution, no
    /// payload decoding, no events. A default value can therefore never
    /// masquerade as presence.
    pub async fn has(&self, key: &str) -> Result<bool> {
        let full = self.item_key(key);
        Ok(self.store.get(&full).await?.is_some())
    }

    /// Batch read: one `(key, outcome)` pair per input key, input order
    /// preserved, misses as `Ok(None)`.
    ///
    /// Each key's outcome is independent: an entry that fails to decode
    /// yields that key's `Err` without failing the rest of the batch.
    /// Hit events fire only for keys whose entries decoded; miss events
    /// fire per absent key. Stores without a batch capability are
    /// emulated with one `get` per key, in order.
    ///
    /// # Errors
    ///
    /// Fails as a whole only when the batch read itself hits a backend
    /// error; per-key misses and decode failures are reported in place.
    pub async fn many<T: DeserializeOwned>(
        &self,
        keys: &[&str],
    ) -> Result<Vec<(String, Result<Option<T>>)>> {
        let full_keys: Vec<String> = keys.iter().map(|k| self.item_key(k)).collect();
        let refs: Vec<&str> = full_keys.iter().map(String::as_str).collect();
        let raw = self.store.many(&refs).await?;

        let mut results = Vec::with_capacity(keys.len());
        for ((logical, full), bytes) in keys.iter().zip(full_keys.iter()).zip(raw) {
            let outcome = match bytes {
                Some(bytes) => match serde_json::from_slice(&bytes) {
                    Ok(value) => {
                        self.events.cache_hit(full);
                        Ok(Some(value))
                    }
                    Err(e) => Err(Error::from(e)),
                },
                None => {
                    self.events.cache_missed(full);
                    Ok(None)
                }
            };
            results.push(((*logical).to_string(), outcome));
        }
        Ok(results)
    }

    /// Batch read with a caller-supplied default per key.
    ///
    /// This is a distinct code path from [`Repository::many`]: the bare
    /// key-list form resolves every miss to `None`, while this form
    /// resolves each miss to its own default. Per-key outcomes are
    /// independent, decode failures included; a default never stands in
    /// for an entry that failed to decode. Input order is preserved and
    /// hit/miss events fire per key.
    pub async fn many_or<T: DeserializeOwned>(
        &self,
        defaults: Vec<(&str, T)>,
    ) -> Result<Vec<(String, Result<T>)>> {
        let full_keys: Vec<String> = defaults.iter().map(|(k, _)| self.item_key(k)).collect();
        let refs: Vec<&str> = full_keys.iter().map(String::as_str).collect();
        let raw = self.store.many(&refs).await?;

        let mut results = Vec::with_capacity(defaults.len());
        for (((logical, default), full), bytes) in
            defaults.into_iter().zip(full_keys.iter()).zip(raw)
        {
            let outcome = match bytes {
                Some(bytes) => match serde_json::from_slice(&bytes) {
                    Ok(value) => {
                        self.events.cache_hit(full);
                        Ok(value)
                    }
                    Err(e) => Err(Error::from(e)),
                },
                None => {
                    self.events.cache_missed(full);
                    Ok(default)
                }
            };
            results.push((logical.to_string(), outcome));
        }
        Ok(results)
    }

    /// Retrieve and remove a value (read-then-delete).
    ///
    /// Returns what [`Repository::get`] would have returned. The entry
    /// is decoded before it is deleted, so a read that fails to decode
    /// leaves the entry intact, exactly as `get` would. If the delete
    /// fails after a successful read, the value is still returned and
    /// the failure is logged as a warning.
    pub async fn pull<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let full = self.item_key(key);
        match self.store.get(&full).await? {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes)?;
                self.events.cache_hit(&full);
                match self.store.forget(&full).await {
                    Ok(true) => self.events.key_forgotten(&full),
                    Ok(false) => {}
                    Err(e) => warn!("Failed to forget {} after pull: {}", full, e),
                }
                Ok(Some(value))
            }
            None => {
                self.events.cache_missed(&full);
                Ok(None)
            }
        }
    }

    /// [`Repository::pull`] with a default on a miss.
    pub async fn pull_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T> {
        Ok(self.pull(key).await?.unwrap_or(default))
    }

    /// Store a value with the given expiry, overwriting any entry.
    ///
    /// Returns `Ok(false)` without touching the store when the expiry is
    /// unusable (soft failure; never writes a degenerate TTL). On a write,
    /// fires a `key_written` event carrying the key, payload, and TTL.
    ///
    /// # Errors
    ///
    /// - `Error::SerializationError`: the value does not serialize
    /// - `Error::BackendError`: the store is unavailable
    pub async fn put<T: Serialize>(&self, key: &str, value: &T, expiry: Expiry) -> Result<bool> {
        let Some(seconds) = expiry.as_seconds() else {
            debug!("✗ Skipping PUT {}: unusable expiry", key);
            return Ok(false);
        };

        let full = self.item_key(key);
        let bytes = serde_json::to_vec(value)?;
        self.store.put(&full, bytes.clone(), seconds).await?;
        self.events.key_written(&full, &bytes, Some(seconds));
        Ok(true)
    }

    /// Store several values with the same expiry.
    ///
    /// Each key's outcome is independent: a failing write does not roll
    /// back previously written keys and does not stop the rest. The
    /// result is one `(key, outcome)` pair per entry, input order
    /// preserved; writes fan out concurrently but per-key event
    /// attribution is kept.
    pub async fn put_many<T: Serialize>(
        &self,
        entries: &[(&str, T)],
        expiry: Expiry,
    ) -> Vec<(String, Result<bool>)> {
        let writes = entries.iter().map(|(key, value)| async move {
            ((*key).to_string(), self.put(*key, value, expiry).await)
        });
        join_all(writes).await
    }

    /// Store a value only if the key is currently absent.
    ///
    /// Prefers the store's atomic set-if-not-exists when
    /// `supports_atomic_add` reports it; otherwise degrades to
    /// check-then-act, which is **not** race-free across concurrent
    /// writers (both may observe absence and both write; last write
    /// wins). Returns `Ok(true)` iff the value was newly stored;
    /// `Ok(false)` when the expiry is unusable or the key already exists.
    pub async fn add<T: Serialize>(&self, key: &str, value: &T, expiry: Expiry) -> Result<bool> {
        let Some(seconds) = expiry.as_seconds() else {
            debug!("✗ Skipping ADD {}: unusable expiry", key);
            return Ok(false);
        };

        let full = self.item_key(key);
        let bytes = serde_json::to_vec(value)?;

        if self.store.supports_atomic_add() {
            let added = self.store.add(&full, bytes.clone(), seconds).await?;
            if added {
                self.events.key_written(&full, &bytes, Some(seconds));
            }
            return Ok(added);
        }

        // Degraded mode: check-then-act, racy under concurrent callers
        if self.store.get(&full).await?.is_some() {
            return Ok(false);
        }
        self.store.put(&full, bytes.clone(), seconds).await?;
        self.events.key_written(&full, &bytes, Some(seconds));
        Ok(true)
    }

    /// Atomically increment a counter, delegating to the store.
    ///
    /// # Errors
    ///
    /// `Error::NotSupported` if the store lacks atomic counters; the
    /// facade performs no client-side arithmetic fallback.
    pub async fn increment(&self, key: &str, delta: i64) -> Result<i64> {
        self.store.increment(&self.item_key(key), delta).await
    }

    /// Atomically decrement a counter, delegating to the store.
    ///
    /// # Errors
    ///
    /// `Error::NotSupported` if the store lacks atomic counters.
    pub async fn decrement(&self, key: &str, delta: i64) -> Result<i64> {
        self.store.decrement(&self.item_key(key), delta).await
    }

    /// Store a value with no expiration.
    ///
    /// Fires `key_written` with a `None` TTL, signaling permanence.
    pub async fn forever<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let full = self.item_key(key);
        let bytes = serde_json::to_vec(value)?;
        self.store.forever(&full, bytes.clone()).await?;
        self.events.key_written(&full, &bytes, None);
        Ok(())
    }

    /// Return the cached value, or compute, store, and return it.
    ///
    /// `compute` is invoked at most once per call and never retried. On a
    /// miss the result is stored with `put` (so an unusable expiry makes
    /// the write a no-op while the computed value is still returned).
    /// Concurrent callers racing on the same key may each compute; see
    /// the module docs.
    pub async fn remember<T, F, Fut>(&self, key: &str, expiry: Expiry, compute: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        if let Some(value) = self.get(key).await? {
            return Ok(value);
        }

        let value = compute().await;
        self.put(key, &value, expiry).await?;
        Ok(value)
    }

    /// [`Repository::remember`] with `forever` storage semantics.
    pub async fn remember_forever<T, F, Fut>(&self, key: &str, compute: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        if let Some(value) = self.get(key).await? {
            return Ok(value);
        }

        let value = compute().await;
        self.forever(key, &value).await?;
        Ok(value)
    }

    /// Alias for [`Repository::remember_forever`].
    pub async fn sear<T, F, Fut>(&self, key: &str, compute: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        self.remember_forever(key, compute).await
    }

    /// Delete an entry.
    ///
    /// Returns the store's delete-occurred result and fires
    /// `key_forgotten` when something was removed.
    pub async fn forget(&self, key: &str) -> Result<bool> {
        let full = self.item_key(key);
        let removed = self.store.forget(&full).await?;
        if removed {
            self.events.key_forgotten(&full);
        }
        Ok(removed)
    }

    /// Store a value using the repository's default cache time.
    ///
    /// The index-style write surface: together with `has`/`get`/`forget`
    /// this covers the bracket-accessor quartet.
    pub async fn insert<T: Serialize>(&self, key: &str, value: &T) -> Result<bool> {
        self.put(key, value, Expiry::Minutes(self.default_minutes))
            .await
    }
}
