//! Error Types for Yield Advisor
//!
//! Public advisor operations degrade instead of failing; these errors surface
//! at construction time (config, knowledge base, cache connection) and inside
//! the cache stores before they are logged and swallowed.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdvisorError>;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Knowledge base error: {0}")]
    KnowledgeBase(String),

    #[error("Cache timed out after {0:?}")]
    CacheTimeout(std::time::Duration),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
