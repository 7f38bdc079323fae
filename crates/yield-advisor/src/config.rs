//! Advisor Configuration
//!
//! Read from environment variables; every value has a default so an empty
//! environment yields a working in-process setup.

use std::path::PathBuf;
use std::time::Duration;

use rust_decimal::Decimal;

use crate::error::{AdvisorError, Result};

/// Cache configuration
#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// Entry lifetime in seconds; also the strategy identifier window
    pub ttl_secs: u64,

    /// Redis connection URL; `None` selects the in-process cache
    pub redis_url: Option<String>,

    /// Redis connect timeout in milliseconds
    pub connect_timeout_ms: u64,

    /// Per-operation Redis timeout in milliseconds
    pub op_timeout_ms: u64,

    /// Entry limit for the in-process cache
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 3600,
            redis_url: None,
            connect_timeout_ms: 2000,
            op_timeout_ms: 500,
            max_capacity: 10_000,
        }
    }
}

impl CacheConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ttl_secs: env_parse("CACHE_TTL_SECS").unwrap_or(defaults.ttl_secs),
            redis_url: redis_url_from_env(),
            connect_timeout_ms: env_parse("REDIS_CONNECT_TIMEOUT_MS").unwrap_or(defaults.connect_timeout_ms),
            op_timeout_ms: env_parse("REDIS_OP_TIMEOUT_MS").unwrap_or(defaults.op_timeout_ms),
            max_capacity: env_parse("CACHE_MAX_CAPACITY").unwrap_or(defaults.max_capacity),
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn op_timeout(&self) -> Duration {
        Duration::from_millis(self.op_timeout_ms)
    }
}

/// `REDIS_URL`, else `redis://{REDIS_HOST}:{REDIS_PORT}` when a host is set
fn redis_url_from_env() -> Option<String> {
    if let Some(url) = std::env::var("REDIS_URL").ok().filter(|u| !u.trim().is_empty()) {
        return Some(url);
    }

    let host = std::env::var("REDIS_HOST").ok().filter(|h| !h.trim().is_empty())?;
    let port = std::env::var("REDIS_PORT").unwrap_or_else(|_| "6379".into());
    Some(format!("redis://{host}:{port}"))
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Top-level advisor configuration
#[derive(Clone, Debug)]
pub struct AdvisorConfig {
    pub cache: CacheConfig,

    /// Knowledge base JSON document
    pub knowledge_base_path: PathBuf,

    /// Gas budget applied when a request gives none, USD
    pub default_max_gas_usd: Decimal,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            knowledge_base_path: PathBuf::from("data/yield_strategies.json"),
            default_max_gas_usd: Decimal::ONE_HUNDRED,
        }
    }
}

impl AdvisorConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache: CacheConfig::from_env(),
            knowledge_base_path: std::env::var("KNOWLEDGE_BASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.knowledge_base_path),
            default_max_gas_usd: env_parse("MAX_GAS_USD").unwrap_or(defaults.default_max_gas_usd),
        }
    }

    /// Reject values no operation can work with
    pub fn validate(&self) -> Result<()> {
        if self.cache.ttl_secs == 0 {
            return Err(AdvisorError::Config("CACHE_TTL_SECS must be positive".into()));
        }
        if self.default_max_gas_usd.is_sign_negative() {
            return Err(AdvisorError::Config("MAX_GAS_USD must not be negative".into()));
        }
        Ok(())
    }
}
