use crate::kv::{ConnectionOptions, DEFAULT_ADDRESS};
use crate::storage::StorageOptions;
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for sumi-kv
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub redis: RedisConfig,
    pub storage: StorageConfig,
    pub cache: Option<CacheConfig>,
}

/// Store connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    /// Server address as `host:port`
    #[serde(default = "default_address")]
    pub address: String,

    /// Password for the server (empty for none)
    #[serde(default)]
    pub password: String,

    /// Database index
    #[serde(default)]
    pub db: i64,

    /// Full connection URL; overrides the fields above when set
    pub url: Option<String>,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            password: String::new(),
            db: 0,
            url: None,
        }
    }
}

fn default_address() -> String {
    DEFAULT_ADDRESS.to_string()
}

/// Crawl state storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Namespace prefix for visited markers, cookies and the request queue
    pub prefix: String,

    /// Seconds before a visited marker expires (0 = never)
    #[serde(rename = "visited-expiration-secs", default)]
    pub visited_expiration_secs: u64,
}

/// Response cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Namespace prefix for cache entries
    pub prefix: String,

    /// Seconds before a cache entry expires
    #[serde(rename = "expiration-secs")]
    pub expiration_secs: u64,
}

impl RedisConfig {
    pub fn connection_options(&self) -> ConnectionOptions {
        ConnectionOptions {
            address: self.address.clone(),
            password: Some(self.password.clone()).filter(|p| !p.is_empty()),
            db: self.db,
            url: self.url.clone(),
        }
    }
}

impl StorageConfig {
    pub fn expires(&self) -> Option<Duration> {
        match self.visited_expiration_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

impl CacheConfig {
    pub fn expiration(&self) -> Duration {
        Duration::from_secs(self.expiration_secs)
    }
}

impl Config {
    /// Options for a crawl state storage that connects on `initialize()`
    pub fn storage_options(&self) -> StorageOptions {
        StorageOptions {
            connection: self.redis.connection_options(),
            prefix: self.storage.prefix.clone(),
            expires: self.storage.expires(),
        }
    }
}
