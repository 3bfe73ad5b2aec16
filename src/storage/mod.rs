//! Storage module for persisting crawl state
//!
//! This module keeps the crawler's ephemeral state in the key-value store:
//! - Visited markers for request IDs, with optional expiration
//! - One cookie record per host
//! - A FIFO queue of pending requests
//! - Bulk clearing of everything under the namespace prefix

mod kv_storage;
mod traits;

pub use kv_storage::{cookie_host, KvStorage, StorageOptions};
pub use traits::{QueueStorage, StorageError, StorageResult, VisitedStorage};

use crate::kv::RedisStore;

/// Crawl state storage backed by Redis
pub type RedisStorage = KvStorage<RedisStore>;
