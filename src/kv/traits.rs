//! Key-value store trait and error types
//!
//! This module defines the small set of store primitives the adapters are
//! built on. Every method is a single round trip to the store.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use crate::kv::ConnectionOptions;

/// Errors that can occur while talking to the key-value store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("WRONGTYPE operation against key '{key}' holding the wrong kind of value")]
    WrongType { key: String },
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for key-value store backends
///
/// `None` is the store's native "absent" signal. Adapters translate it into
/// their own domain errors.
pub trait KeyValueStore: Send + Sync {
    /// Reads a string value
    fn get(&self, key: &str) -> impl Future<Output = StoreResult<Option<Vec<u8>>>> + Send;

    /// Writes a string value, overwriting any existing value
    ///
    /// With `ttl == None` the key persists until deleted. With a ttl the
    /// expiration clock is reset on every write.
    fn set(
        &self,
        key: &str,
        value: &[u8],
        ttl: Option<Duration>,
    ) -> impl Future<Output = StoreResult<()>> + Send;

    /// Deletes the given keys, returning how many existed
    ///
    /// An empty key list is a no-op.
    fn del(&self, keys: &[String]) -> impl Future<Output = StoreResult<u64>> + Send;

    /// Lists keys matching a glob-style pattern
    fn keys(&self, pattern: &str) -> impl Future<Output = StoreResult<Vec<String>>> + Send;

    /// Appends a value to the tail of a list, returning the new length
    fn rpush(&self, key: &str, value: &[u8]) -> impl Future<Output = StoreResult<u64>> + Send;

    /// Removes and returns the head of a list
    fn lpop(&self, key: &str) -> impl Future<Output = StoreResult<Option<Vec<u8>>>> + Send;

    /// Length of a list (0 when the key is absent)
    fn llen(&self, key: &str) -> impl Future<Output = StoreResult<u64>> + Send;

    /// Round-trip liveness check
    fn ping(&self) -> impl Future<Output = StoreResult<()>> + Send;
}

/// Stores that can open their own connection from [`ConnectionOptions`]
pub trait Connect: KeyValueStore + Sized {
    fn connect(options: &ConnectionOptions) -> impl Future<Output = StoreResult<Self>> + Send;
}
