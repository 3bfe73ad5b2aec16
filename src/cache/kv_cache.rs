use crate::cache::{Cache, CacheError, CacheResult};
use crate::keys::KeySpace;
use crate::kv::KeyValueStore;
use std::time::Duration;
use tracing::debug;

/// Cache adapter over a [`KeyValueStore`]
///
/// Holds no mutable state of its own; concurrent use is as safe as the
/// underlying store client.
#[derive(Debug, Clone)]
pub struct KvCache<S> {
    store: S,
    keys: KeySpace,
    expiration: Duration,
}

impl<S: KeyValueStore> KvCache<S> {
    /// Creates a cache writing under `prefix` with a fixed expiration
    ///
    /// # Returns
    ///
    /// * `Ok(KvCache)` - The cache adapter
    /// * `Err(CacheError::InvalidExpiration)` - `expiration` is zero
    pub fn new(store: S, prefix: impl Into<String>, expiration: Duration) -> CacheResult<Self> {
        if expiration.is_zero() {
            return Err(CacheError::InvalidExpiration);
        }

        Ok(Self {
            store,
            keys: KeySpace::new(prefix),
            expiration,
        })
    }

    pub fn expiration(&self) -> Duration {
        self.expiration
    }

    pub fn prefix(&self) -> &str {
        self.keys.prefix()
    }
}

impl<S: KeyValueStore> Cache for KvCache<S> {
    async fn get(&self, key: &str) -> CacheResult<Vec<u8>> {
        let store_key = self.keys.entry(key);
        match self.store.get(&store_key).await? {
            Some(value) => {
                debug!(key = %store_key, "Cache HIT");
                Ok(value)
            }
            None => {
                debug!(key = %store_key, "Cache MISS");
                Err(CacheError::NotFound)
            }
        }
    }

    async fn put(&self, key: &str, value: &[u8]) -> CacheResult<()> {
        let store_key = self.keys.entry(key);
        self.store
            .set(&store_key, value, Some(self.expiration))
            .await?;
        debug!(key = %store_key, bytes = value.len(), "Cache PUT");
        Ok(())
    }
}
