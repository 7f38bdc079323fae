//! Strategy Cache
//!
//! One capability, two stores. Callers hold `Arc<dyn StrategyCache>` and never
//! learn which store is behind it.
//!
//! Stores are infallible from the caller's side: a failed read is a miss and a
//! failed write is dropped, each logged at `warn`.

mod memory;
mod redis_store;

pub use memory::MemoryCache;
pub use redis_store::RedisCache;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::CacheConfig;

/// Key-value store for serialized recommendation lists
#[async_trait]
pub trait StrategyCache: Send + Sync {
    /// Cached value, or `None` on miss or failure
    async fn get(&self, key: &str) -> Option<String>;

    /// Store a value that expires after `ttl`
    async fn set(&self, key: &str, value: String, ttl: Duration);

    /// Store name for logging
    fn name(&self) -> &str;
}

/// Open the configured store.
///
/// Tries Redis when a URL is configured, bounded by the connect timeout, and
/// falls back to the in-process cache on any failure.
pub async fn connect(config: &CacheConfig) -> Arc<dyn StrategyCache> {
    if let Some(url) = &config.redis_url {
        match RedisCache::connect(url, config.connect_timeout(), config.op_timeout()).await {
            Ok(cache) => {
                tracing::info!("Connected to Redis cache");
                return Arc::new(cache);
            }
            Err(e) => {
                tracing::warn!("Redis unavailable, using in-memory cache: {}", e);
            }
        }
    }

    Arc::new(MemoryCache::new(config.max_capacity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_without_redis_uses_memory() {
        let cache = connect(&CacheConfig::default()).await;
        assert_eq!(cache.name(), "memory");
    }

    #[tokio::test]
    async fn test_connect_falls_back_on_bad_url() {
        let config = CacheConfig {
            redis_url: Some("not a redis url".into()),
            ..Default::default()
        };
        let cache = connect(&config).await;
        assert_eq!(cache.name(), "memory");
    }
}
