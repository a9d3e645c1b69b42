//! Observer hooks for cache lifecycle events.
//!
//! The facade publishes "hit", "miss", "key written", and "key forgotten"
//! events through the [`CacheEvents`] trait. Wire it to your event bus or
//! metrics system by implementing the trait; the notification mechanism
//! itself lives outside this crate.
//!
//! ```ignore
//! use cache_facade::CacheEvents;
//!
//! struct BusEvents { /* channel sender, metrics handles, ... */ }
//!
//! impl CacheEvents for BusEvents {
//!     fn cache_hit(&self, key: &str) {
//!         // counter!("cache_hits").inc();
//!     }
//!     // ... other hooks
//! }
//!
//! // let cache = Repository::new(store).with_events(Box::new(BusEvents { .. }));
//! ```
//!
//! Default behavior (if a hook is not overridden) logs via the `log` crate.
//! [`NoOpEvents`] discards everything, making the no-listener case a true
//! no-op.

/// Trait for observing cache lifecycle events.
///
/// Batch operations fire these hooks once per key, in input order, so
/// per-key hit/miss accounting is preserved.
pub trait CacheEvents: Send + Sync {
    /// A read found an entry for `key`.
    fn cache_hit(&self, key: &str) {
        debug!("Cache HIT: {}", key);
    }

    /// A read found no entry for `key`.
    fn cache_missed(&self, key: &str) {
        debug!("Cache MISS: {}", key);
    }

    /// An entry was written. `ttl_seconds` is `None` for permanent writes.
    fn key_written(&self, key: &str, value: &[u8], ttl_seconds: Option<u64>) {
        match ttl_seconds {
            Some(secs) => debug!("Cache WRITE: {} ({} bytes, TTL {}s)", key, value.len(), secs),
            None => debug!("Cache WRITE: {} ({} bytes, forever)", key, value.len()),
        }
    }

    /// An entry was deleted.
    fn key_forgotten(&self, key: &str) {
        debug!("Cache FORGET: {}", key);
    }
}

/// Default events implementation (no-op).
#[derive(Clone, Default)]
pub struct NoOpEvents;

impl CacheEvents for NoOpEvents {
    fn cache_hit(&self, _key: &str) {}
    fn cache_missed(&self, _key: &str) {}
    fn key_written(&self, _key: &str, _value: &[u8], _ttl_seconds: Option<u64>) {}
    fn key_forgotten(&self, _key: &str) {}
}
