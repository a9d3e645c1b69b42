//! Basic usage example of the cache facade.

use cache_facade::{error::Result, Expiry, MemoryStore, Repository};
use serde::{Deserialize, Serialize};

/// Example payload: a user session
#[derive(Clone, Serialize, Deserialize, Debug)]
struct Session {
    user_id: String,
    token: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .try_init()
        .ok();

    println!("\n=== Cache Facade - Basic Example ===\n");

    // 1. Initialize the facade over the in-memory store
    println!("1. Initializing in-memory cache...");
    let cache = Repository::new(MemoryStore::new()).with_prefix("demo");
    println!("   ✓ Cache ready\n");

    // 2. Write with a lifetime, read back
    println!("2. Store and retrieve a typed value:");
    let session = Session {
        user_id: "user_001".to_string(),
        token: "tok_abc123".to_string(),
    };
    cache.put("session:alice", &session, Expiry::Minutes(10.0)).await?;

    let cached: Option<Session> = cache.get("session:alice").await?;
    if let Some(s) = &cached {
        println!("   ✓ Session loaded for {} ({})\n", s.user_id, s.token);
    }

    // 3. Compute-if-absent: the closure runs only on a miss
    println!("3. remember (compute-if-absent):");
    let answer: i64 = cache
        .remember("answer", Expiry::Minutes(5.0), || async { 6 * 7 })
        .await?;
    println!("   ✓ Computed: {}", answer);

    let answer: i64 = cache
        .remember("answer", Expiry::Minutes(5.0), || async {
            unreachable!("already cached")
        })
        .await?;
    println!("   ✓ Served from cache: {}\n", answer);

    // 4. Conditional add: only the first writer wins
    println!("4. add (store-if-absent):");
    let claimed = cache.add("leader", &"first", Expiry::Minutes(1.0)).await?;
    let contested = cache.add("leader", &"second", Expiry::Minutes(1.0)).await?;
    println!("   ✓ First writer claimed: {}", claimed);
    println!("   ✓ Second writer rejected: {}\n", !contested);

    // 5. Atomic counters
    println!("5. Counters:");
    cache.increment("visits", 1).await?;
    let count = cache.increment("visits", 9).await?;
    println!("   ✓ visits = {}\n", count);

    // 6. Read-then-delete
    println!("6. pull (read-then-delete):");
    let pulled: Option<Session> = cache.pull("session:alice").await?;
    if pulled.is_some() {
        println!("   ✓ Session pulled");
    }
    if !cache.has("session:alice").await? {
        println!("   ✓ Entry gone after pull\n");
    }

    // 7. Unusable expiry is a no-op, not an error
    println!("7. Degenerate expiry:");
    let written = cache.put("ghost", &"never", Expiry::Minutes(0.0)).await?;
    if !written {
        println!("   ✓ Zero-minute write skipped (as expected)\n");
    }

    println!("=== Example Complete ===\n");

    Ok(())
}
