//! Redis-backed cache (`GET` / `SETEX`)

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use super::StrategyCache;
use crate::error::{AdvisorError, Result};

/// Strategy cache shared across processes through Redis
#[derive(Clone)]
pub struct RedisCache {
    manager: ConnectionManager,
    op_timeout: Duration,
}

impl RedisCache {
    /// Connect, giving up after `connect_timeout`
    pub async fn connect(url: &str, connect_timeout: Duration, op_timeout: Duration) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let manager = tokio::time::timeout(connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| AdvisorError::CacheTimeout(connect_timeout))??;

        Ok(Self { manager, op_timeout })
    }

    async fn bounded<T>(&self, op: impl Future<Output = redis::RedisResult<T>>) -> Result<T> {
        tokio::time::timeout(self.op_timeout, op)
            .await
            .map_err(|_| AdvisorError::CacheTimeout(self.op_timeout))?
            .map_err(AdvisorError::from)
    }

    async fn try_get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.manager.clone();
        self.bounded(conn.get(key)).await
    }

    async fn try_set(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        let mut conn = self.manager.clone();
        // SETEX rejects a zero expiry
        let seconds = ttl.as_secs().max(1);
        self.bounded(conn.set_ex(key, value, seconds)).await
    }
}

#[async_trait]
impl StrategyCache for RedisCache {
    async fn get(&self, key: &str) -> Option<String> {
        match self.try_get(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Redis GET {} failed: {}", key, e);
                None
            }
        }
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) {
        if let Err(e) = self.try_set(key, value, ttl).await {
            tracing::warn!("Redis SETEX {} failed: {}", key, e);
        }
    }

    fn name(&self) -> &str {
        "redis"
    }
}
