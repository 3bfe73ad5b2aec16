//! Byte cache backed by the key-value store
//!
//! Cached HTTP responses are stored as raw bytes under `<prefix>:<key>` with
//! one expiration shared by every entry. Eviction is left to the store's own
//! expiration.

mod kv_cache;

pub use kv_cache::KvCache;

use std::future::Future;
use thiserror::Error;

use crate::kv::StoreError;

/// Errors that can occur during cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    /// No entry exists for the key (never written, or expired)
    #[error("not found")]
    NotFound,

    #[error("Cache expiration must be non-zero")]
    InvalidExpiration,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl CacheError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Trait for byte caches
pub trait Cache: Send + Sync {
    /// Returns the cached bytes, or [`CacheError::NotFound`] if absent
    fn get(&self, key: &str) -> impl Future<Output = CacheResult<Vec<u8>>> + Send;

    /// Stores bytes, replacing any previous entry and restarting its expiration
    fn put(&self, key: &str, value: &[u8]) -> impl Future<Output = CacheResult<()>> + Send;
}
