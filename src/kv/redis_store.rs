//! Redis store backend
//!
//! Uses `redis::aio::ConnectionManager` for async multiplexed connections
//! with automatic reconnection.

use crate::kv::traits::{Connect, KeyValueStore, StoreError, StoreResult};
use crate::kv::{redact_url, ConnectionOptions};
use std::time::Duration;
use tracing::debug;

/// Redis-backed key-value store
#[derive(Clone)]
pub struct RedisStore {
    connection_manager: redis::aio::ConnectionManager,
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("connection_manager", &"ConnectionManager")
            .finish()
    }
}

impl RedisStore {
    /// Opens a connection to the server at `url`
    pub async fn open(url: &str) -> StoreResult<Self> {
        let client = redis::Client::open(url).map_err(|e| {
            StoreError::Connection(format!("Failed to create Redis client: {}", e))
        })?;
        Self::from_client(client).await
    }

    /// Wraps an already-configured client
    pub async fn from_client(client: redis::Client) -> StoreResult<Self> {
        let connection_manager = redis::aio::ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Connection(format!("Failed to connect to Redis: {}", e)))?;
        Ok(Self { connection_manager })
    }
}

impl Connect for RedisStore {
    async fn connect(options: &ConnectionOptions) -> StoreResult<Self> {
        let url = options.to_url()?;
        let store = Self::open(url.as_str()).await?;
        debug!(url = %redact_url(&url), "Redis store connected");
        Ok(store)
    }
}

impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let mut conn = self.connection_manager.clone();
        let value: Option<Vec<u8>> = redis::cmd("GET").arg(key).query_async(&mut conn).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> StoreResult<()> {
        let mut conn = self.connection_manager.clone();

        // Sub-second expirations need millisecond precision
        let cmd = match ttl {
            None => {
                let mut cmd = redis::cmd("SET");
                cmd.arg(key).arg(value);
                cmd
            }
            Some(ttl) if ttl.subsec_nanos() == 0 => {
                let mut cmd = redis::cmd("SETEX");
                cmd.arg(key).arg(ttl.as_secs()).arg(value);
                cmd
            }
            Some(ttl) => {
                let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);
                let mut cmd = redis::cmd("PSETEX");
                cmd.arg(key).arg(millis).arg(value);
                cmd
            }
        };

        cmd.query_async::<()>(&mut conn).await?;
        Ok(())
    }

    async fn del(&self, keys: &[String]) -> StoreResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.connection_manager.clone();
        let deleted: u64 = redis::cmd("DEL").arg(keys).query_async(&mut conn).await?;
        Ok(deleted)
    }

    async fn keys(&self, pattern: &str) -> StoreResult<Vec<String>> {
        let mut conn = self.connection_manager.clone();
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(pattern)
            .query_async(&mut conn)
            .await?;
        Ok(keys)
    }

    async fn rpush(&self, key: &str, value: &[u8]) -> StoreResult<u64> {
        let mut conn = self.connection_manager.clone();
        let len: u64 = redis::cmd("RPUSH")
            .arg(key)
            .arg(value)
            .query_async(&mut conn)
            .await?;
        Ok(len)
    }

    async fn lpop(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let mut conn = self.connection_manager.clone();
        let value: Option<Vec<u8>> = redis::cmd("LPOP").arg(key).query_async(&mut conn).await?;
        Ok(value)
    }

    async fn llen(&self, key: &str) -> StoreResult<u64> {
        let mut conn = self.connection_manager.clone();
        let len: u64 = redis::cmd("LLEN").arg(key).query_async(&mut conn).await?;
        Ok(len)
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.connection_manager.clone();
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        if pong != "PONG" {
            return Err(StoreError::Connection(format!(
                "Unexpected PING reply: {}",
                pong
            )));
        }
        Ok(())
    }
}
