//! # cache-facade
//!
//! A uniform cache facade over swappable key-value store adapters.
//!
//! ## Features
//!
//! - **Uniform semantics:** One contract for reads, writes, expirations,
//!   conditional adds, counters, and batch operations, regardless of backend
//! - **Backend agnostic:** In-memory (default), Redis, or any custom [`Store`]
//! - **Typed payloads:** Any `serde` type goes in and comes back out
//! - **Observable:** Hit, miss, write, and forget hooks via [`CacheEvents`]
//! - **Honest about races:** Atomic primitives are used when a store has
//!   them; degraded fallbacks are explicit, detectable, and documented
//!
//! ## Quick Start
//!
//! ```no_run
//! use cache_facade::{Expiry, MemoryStore, Repository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cache = Repository::new(MemoryStore::new());
//!
//!     // Write with a 10 minute lifetime, read back
//!     cache.put("greeting", &"hello", Expiry::Minutes(10.0)).await?;
//!     let value: Option<String> = cache.get("greeting").await?;
//!     assert_eq!(value.as_deref(), Some("hello"));
//!
//!     // Compute-if-absent
//!     let sum: i64 = cache
//!         .remember("sum", Expiry::Minutes(5.0), || async { 2 + 2 })
//!         .await?;
//!     assert_eq!(sum, 4);
//!
//!     // Store-if-absent, at most one writer wins
//!     let claimed = cache.add("lock", &"me", Expiry::Minutes(1.0)).await?;
//!     assert!(claimed);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Custom stores
//!
//! Implement [`Store`] for your backend. Only `get`/`put`/`forever`/`forget`
//! are required; batch reads, atomic adds, and counters are optional
//! capabilities the facade either emulates (`many`, `add`) or surfaces as
//! `NotSupported` (counters, which are never emulated client-side).

#[macro_use]
extern crate log;

pub mod error;
pub mod events;
pub mod expiry;
pub mod repository;
pub mod store;

// Re-exports for convenience
pub use error::{Error, Result};
pub use events::{CacheEvents, NoOpEvents};
pub use expiry::Expiry;
pub use repository::Repository;
pub use store::{MemoryStore, Store};
#[cfg(feature = "redis")]
pub use store::{RedisConfig, RedisStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
