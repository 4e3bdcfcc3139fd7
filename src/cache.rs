//! Time-bounded response cache shared by the upstream clients.
//!
//! Fetches are idempotent, so results can be memoized by their argument for a
//! fixed TTL. Only successful responses are stored; a failed fetch is retried
//! on the next evaluation instead of being pinned for the whole TTL.
//!
//! Expiry and eviction are left to `moka`, so entries for keys that are never
//! read again still age out.

use moka::future::Cache as MokaCache;
use std::hash::Hash;
use std::time::Duration;

/// Upper bound on distinct keys (stations or rounded positions) kept at once.
const MAX_ENTRIES: u64 = 256;

/// In-memory TTL cache handed to a client at construction.
pub struct TtlCache<K, V> {
    inner: MokaCache<K, V>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration) -> Self {
        let inner = MokaCache::builder()
            .max_capacity(MAX_ENTRIES)
            .time_to_live(ttl)
            .build();
        TtlCache { inner }
    }

    /// Fresh value for `key`, if any.
    pub async fn get(&self, key: &K) -> Option<V> {
        self.inner.get(key).await
    }

    pub async fn insert(&self, key: K, value: V) {
        self.inner.insert(key, value).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_fresh_entries() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("akashi".to_string(), 42).await;
        assert_eq!(cache.get(&"akashi".to_string()).await, Some(42));
        assert_eq!(cache.get(&"naruto".to_string()).await, None);
    }

    #[tokio::test]
    async fn expires_stale_entries() {
        let cache = TtlCache::new(Duration::from_millis(10));
        cache.insert(1u8, "table").await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(cache.get(&1).await, None);
    }

    #[tokio::test]
    async fn insert_replaces_previous_value() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert(1u8, 1).await;
        cache.insert(1u8, 2).await;
        assert_eq!(cache.get(&1).await, Some(2));
    }
}
