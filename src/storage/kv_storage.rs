//! Crawl state storage over a key-value store
//!
//! This module provides the store-backed implementation of the storage
//! traits. All keys live under the configured namespace prefix.

use crate::keys::KeySpace;
use crate::kv::{Connect, ConnectionOptions, KeyValueStore};
use crate::storage::traits::{QueueStorage, StorageError, StorageResult, VisitedStorage};
use std::time::Duration;
use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, info, warn};
use url::{Position, Url};

/// Value written for a visited marker
const VISITED_MARKER: &[u8] = b"1";

/// Options for a storage that opens its own connection
#[derive(Debug, Clone, Default)]
pub struct StorageOptions {
    /// How to reach the store
    pub connection: ConnectionOptions,

    /// Namespace prefix for every key. Lets one store database serve
    /// independent crawls.
    pub prefix: String,

    /// Expiration for visited markers. After it elapses, pages are to be
    /// visited again. `None` or zero means markers never expire.
    pub expires: Option<Duration>,
}

/// Crawl state storage backed by a [`KeyValueStore`]
///
/// The client is either supplied up front with [`KvStorage::with_client`] or
/// opened by [`VisitedStorage::initialize`]. Every other operation fails
/// with [`StorageError::NotInitialized`] until a client exists.
#[derive(Debug)]
pub struct KvStorage<S> {
    connection: ConnectionOptions,
    keys: KeySpace,
    expires: Option<Duration>,
    client: OnceCell<S>,

    /// Serializes cookie writes and clears against cookie reads within this
    /// instance only. Other processes sharing the store are not coordinated.
    cookie_lock: RwLock<()>,
}

impl<S: KeyValueStore> KvStorage<S> {
    /// Creates a storage that connects on `initialize()`
    pub fn new(options: StorageOptions) -> Self {
        Self {
            connection: options.connection,
            keys: KeySpace::new(options.prefix),
            expires: normalize_expiration(options.expires),
            client: OnceCell::new(),
            cookie_lock: RwLock::new(()),
        }
    }

    /// Creates a storage over an existing client
    ///
    /// `initialize()` then only verifies that the store is reachable.
    pub fn with_client(client: S, prefix: impl Into<String>, expires: Option<Duration>) -> Self {
        Self {
            connection: ConnectionOptions::default(),
            keys: KeySpace::new(prefix),
            expires: normalize_expiration(expires),
            client: OnceCell::new_with(Some(client)),
            cookie_lock: RwLock::new(()),
        }
    }

    pub fn prefix(&self) -> &str {
        self.keys.prefix()
    }

    /// Expiration applied to visited markers, if any
    pub fn expires(&self) -> Option<Duration> {
        self.expires
    }

    fn client(&self) -> StorageResult<&S> {
        self.client.get().ok_or(StorageError::NotInitialized)
    }

    /// Removes every cookie record, visited marker and the request queue
    ///
    /// Keys are enumerated first and deleted in one batch. If enumeration
    /// fails nothing is deleted. Keys written by other clients between the
    /// two steps may survive.
    ///
    /// # Returns
    ///
    /// The number of keys deleted
    pub async fn clear(&self) -> StorageResult<u64> {
        let _guard = self.cookie_lock.write().await;
        let client = self.client()?;

        let mut keys = client.keys(&self.keys.cookie_pattern()).await?;
        keys.extend(client.keys(&self.keys.request_pattern()).await?);
        keys.push(self.keys.queue());

        let deleted = client.del(&keys).await?;
        info!(prefix = self.prefix(), deleted, "Cleared crawl storage");
        Ok(deleted)
    }

    /// Replaces the cookies stored for `host`, reporting store failures
    pub async fn try_set_cookies(&self, host: &str, cookies: &str) -> StorageResult<()> {
        let _guard = self.cookie_lock.write().await;
        let client = self.client()?;
        client
            .set(&self.keys.cookie(host), cookies.as_bytes(), None)
            .await?;
        debug!(host = host, "Stored cookies");
        Ok(())
    }

    /// Reads the cookies stored for `host`, reporting store failures
    ///
    /// # Returns
    ///
    /// * `Ok(Some(cookies))` - Cookies are stored for the host
    /// * `Ok(None)` - Nothing is stored for the host
    /// * `Err(StorageError)` - The read failed
    pub async fn try_cookies(&self, host: &str) -> StorageResult<Option<String>> {
        let _guard = self.cookie_lock.read().await;
        let client = self.client()?;
        let cookies = client.get(&self.keys.cookie(host)).await?;
        Ok(cookies.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }
}

/// Host (and explicit port) used to key the cookie record of a URL
///
/// The URL is in its parsed form: a port equal to the scheme's default is
/// dropped (`http://example.com:80/` keys as `example.com`) and
/// internationalized hosts appear punycode-encoded (`xn--bcher-kva.example`).
///
/// ```
/// use sumi_kv::storage::cookie_host;
/// use url::Url;
///
/// let url = Url::parse("http://example.com:8080/path?q=1").unwrap();
/// assert_eq!(cookie_host(&url), "example.com:8080");
/// ```
pub fn cookie_host(url: &Url) -> &str {
    &url[Position::BeforeHost..Position::AfterPort]
}

fn normalize_expiration(expires: Option<Duration>) -> Option<Duration> {
    expires.filter(|d| !d.is_zero())
}

impl<S: Connect> VisitedStorage for KvStorage<S> {
    async fn initialize(&self) -> StorageResult<()> {
        let client = self
            .client
            .get_or_try_init(|| async {
                S::connect(&self.connection)
                    .await
                    .map_err(|e| StorageError::Connection(e.to_string()))
            })
            .await?;

        client
            .ping()
            .await
            .map_err(|e| StorageError::Connection(format!("Store ping failed: {}", e)))?;

        info!(prefix = self.prefix(), "Crawl storage initialized");
        Ok(())
    }

    async fn mark_visited(&self, request_id: u64) -> StorageResult<()> {
        let client = self.client()?;
        client
            .set(&self.keys.request(request_id), VISITED_MARKER, self.expires)
            .await?;
        Ok(())
    }

    async fn is_visited(&self, request_id: u64) -> StorageResult<bool> {
        let client = self.client()?;
        let marker = client.get(&self.keys.request(request_id)).await?;
        Ok(marker.is_some())
    }

    async fn cookies(&self, url: &Url) -> String {
        let host = cookie_host(url);
        match self.try_cookies(host).await {
            Ok(cookies) => cookies.unwrap_or_default(),
            Err(e) => {
                warn!(host = host, error = %e, "Failed to read cookies");
                String::new()
            }
        }
    }

    async fn set_cookies(&self, url: &Url, cookies: &str) {
        let host = cookie_host(url);
        if let Err(e) = self.try_set_cookies(host, cookies).await {
            warn!(host = host, error = %e, "Failed to store cookies");
        }
    }
}

impl<S: KeyValueStore> QueueStorage for KvStorage<S> {
    async fn enqueue(&self, request: &[u8]) -> StorageResult<()> {
        let client = self.client()?;
        client.rpush(&self.keys.queue(), request).await?;
        Ok(())
    }

    async fn dequeue(&self) -> StorageResult<Vec<u8>> {
        let client = self.client()?;
        let queue = self.keys.queue();
        let head = client.lpop(&queue).await?;
        head.ok_or(StorageError::NotFound(queue))
    }

    async fn size(&self) -> StorageResult<usize> {
        let client = self.client()?;
        let len = client.llen(&self.keys.queue()).await?;
        Ok(usize::try_from(len).unwrap_or(usize::MAX))
    }
}
