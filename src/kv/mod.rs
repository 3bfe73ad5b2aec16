//! Key-value store backends
//!
//! This module provides the store seam the cache and crawl-state adapters
//! are written against:
//! - `KeyValueStore`: the handful of primitives the adapters need
//! - `RedisStore`: a Redis client backed by a reconnecting connection manager
//! - `MemoryStore`: an in-process store with the same semantics
//! - `matches_glob`: Redis-style glob matching used for key enumeration

mod memory;
mod pattern;
mod redis_store;
mod traits;

pub use memory::MemoryStore;
pub use pattern::matches_glob;
pub use redis_store::RedisStore;
pub use traits::{Connect, KeyValueStore, StoreError, StoreResult};

use url::Url;

/// Default Redis address used when none is configured
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:6379";

/// Parameters for opening a store connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionOptions {
    /// Server address as `host:port`
    pub address: String,

    /// Optional password for the server
    pub password: Option<String>,

    /// Database index. Default is 0
    pub db: i64,

    /// Full connection URL; takes precedence over the fields above
    pub url: Option<String>,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            password: None,
            db: 0,
            url: None,
        }
    }
}

impl ConnectionOptions {
    /// Builds the connection URL (`redis://[:password@]address/db`)
    pub fn to_url(&self) -> StoreResult<Url> {
        if let Some(raw) = &self.url {
            return Url::parse(raw)
                .map_err(|e| StoreError::Connection(format!("Invalid store URL: {}", e)));
        }

        let mut url = Url::parse(&format!("redis://{}/{}", self.address, self.db)).map_err(|e| {
            StoreError::Connection(format!("Invalid store address '{}': {}", self.address, e))
        })?;

        if let Some(password) = self.password.as_deref().filter(|p| !p.is_empty()) {
            url.set_password(Some(password)).map_err(|_| {
                StoreError::Connection(format!(
                    "Cannot attach a password to address '{}'",
                    self.address
                ))
            })?;
        }

        Ok(url)
    }
}

/// Redacts the password of a connection URL for logging
pub fn redact_url(url: &Url) -> String {
    let mut redacted = url.clone();
    if redacted.password().is_some() {
        // Only fails for URLs that cannot carry credentials, which have no password
        let _ = redacted.set_password(Some("***"));
    }
    redacted.to_string()
}
