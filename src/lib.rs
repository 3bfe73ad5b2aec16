//! sumi-kv: crawl state and response caching in a key-value store
//!
//! This crate lets a crawler keep its ephemeral data in Redis (or any
//! [`kv::KeyValueStore`]): cached HTTP responses, visited-request markers,
//! per-host cookies and the queue of pending requests. Every key is
//! namespaced by a caller-chosen prefix.

pub mod cache;
pub mod config;
pub mod keys;
pub mod kv;
pub mod storage;

use thiserror::Error;

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

// Re-export commonly used types
pub use cache::{Cache, CacheError, KvCache};
pub use config::Config;
pub use keys::KeySpace;
pub use kv::{KeyValueStore, MemoryStore, RedisStore};
pub use storage::{KvStorage, QueueStorage, RedisStorage, StorageError, VisitedStorage};
