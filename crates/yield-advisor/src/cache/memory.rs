//! In-process cache backed by moka, with per-entry TTL

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;

use super::StrategyCache;

#[derive(Clone, Debug)]
struct Entry {
    value: String,
    ttl: Duration,
}

/// Expires each entry after the TTL it was written with
struct EntryTtl;

impl Expiry<String, Entry> for EntryTtl {
    fn expire_after_create(&self, _key: &String, entry: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-process strategy cache
#[derive(Clone)]
pub struct MemoryCache {
    cache: Cache<String, Entry>,
}

impl MemoryCache {
    pub fn new(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(EntryTtl)
            .build();

        Self { cache }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait]
impl StrategyCache for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        self.cache.get(key).await.map(|entry| entry.value)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) {
        self.cache.insert(key.to_string(), Entry { value, ttl }).await;
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = MemoryCache::default();
        assert!(cache.get("k").await.is_none());

        cache.set("k", "v".into(), Duration::from_secs(60)).await;
        assert_eq!(cache.get("k").await.as_deref(), Some("v"));

        cache.set("k", "v2".into(), Duration::from_secs(60)).await;
        assert_eq!(cache.get("k").await.as_deref(), Some("v2"));
    }

    #[tokio::test]
    async fn test_entry_expires() {
        let cache = MemoryCache::default();
        cache.set("short", "v".into(), Duration::from_millis(50)).await;
        cache.set("long", "v".into(), Duration::from_secs(60)).await;

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(cache.get("short").await.is_none());
        assert!(cache.get("long").await.is_some());
    }
}
