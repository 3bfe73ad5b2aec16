//! Tests against a live Redis server
//!
//! Set `REDIS_URL` (e.g. `redis://localhost:6379/8`) to run them; each test
//! uses a fresh random prefix so runs do not interfere.

use std::time::{Duration, SystemTime, UNIX_EPOCH};
use sumi_kv::cache::{Cache, KvCache};
use sumi_kv::kv::{ConnectionOptions, RedisStore};
use sumi_kv::storage::{
    KvStorage, QueueStorage, RedisStorage, StorageError, StorageOptions, VisitedStorage,
};
use url::Url;

fn redis_url() -> Option<String> {
    let url = std::env::var("REDIS_URL").ok();
    if url.is_none() {
        eprintln!("Skipping Redis test: REDIS_URL is not set");
    }
    url
}

fn unique_prefix(name: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("sumi-kv-test:{}:{}", name, nanos)
}

async fn open_store() -> Option<RedisStore> {
    let url = redis_url()?;
    match RedisStore::open(&url).await {
        Ok(store) => Some(store),
        Err(e) => {
            eprintln!("Skipping Redis test (not available): {}", e);
            None
        }
    }
}

#[tokio::test]
async fn test_redis_cache_roundtrip_and_expiry() {
    let Some(store) = open_store().await else {
        return;
    };

    let cache = KvCache::new(store, unique_prefix("cache"), Duration::from_secs(1)).unwrap();
    let body = "Why doesn't the crawler support a redis cache?";

    cache.put("crawler", body.as_bytes()).await.unwrap();
    assert_eq!(cache.get("crawler").await.unwrap(), body.as_bytes());

    tokio::time::sleep(Duration::from_millis(2100)).await;
    assert!(cache.get("crawler").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_redis_sub_second_expiration() {
    let Some(store) = open_store().await else {
        return;
    };

    let storage =
        KvStorage::with_client(store, unique_prefix("psetex"), Some(Duration::from_millis(300)));
    storage.initialize().await.unwrap();

    storage.mark_visited(1).await.unwrap();
    assert!(storage.is_visited(1).await.unwrap());

    tokio::time::sleep(Duration::from_millis(800)).await;
    assert!(!storage.is_visited(1).await.unwrap());
}

#[tokio::test]
async fn test_redis_storage_lifecycle() {
    let Some(url) = redis_url() else {
        return;
    };

    let storage = RedisStorage::new(StorageOptions {
        connection: ConnectionOptions {
            url: Some(url),
            ..ConnectionOptions::default()
        },
        prefix: unique_prefix("storage"),
        expires: None,
    });
    if let Err(e) = storage.initialize().await {
        eprintln!("Skipping Redis test (not available): {}", e);
        return;
    }

    let page = Url::parse("https://example.com:8080/").unwrap();

    storage.mark_visited(42).await.unwrap();
    storage.set_cookies(&page, "session=abc").await;
    storage.enqueue(b"r1").await.unwrap();
    storage.enqueue(b"r2").await.unwrap();

    assert!(storage.is_visited(42).await.unwrap());
    assert_eq!(storage.cookies(&page).await, "session=abc");
    assert_eq!(storage.size().await.unwrap(), 2);
    assert_eq!(storage.dequeue().await.unwrap(), b"r1".to_vec());

    assert_eq!(storage.clear().await.unwrap(), 3);
    assert!(!storage.is_visited(42).await.unwrap());
    assert_eq!(storage.cookies(&page).await, "");
    assert!(matches!(
        storage.dequeue().await,
        Err(StorageError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_redis_initialize_unreachable_fails() {
    if redis_url().is_none() {
        return;
    }

    // Port 1 is never a Redis server
    let storage = RedisStorage::new(StorageOptions {
        connection: ConnectionOptions {
            address: "127.0.0.1:1".to_string(),
            ..ConnectionOptions::default()
        },
        prefix: unique_prefix("unreachable"),
        expires: None,
    });

    assert!(matches!(
        storage.initialize().await,
        Err(StorageError::Connection(_))
    ));
    assert!(matches!(
        storage.mark_visited(1).await,
        Err(StorageError::NotInitialized)
    ));
}
