use std::sync::Arc;
use std::time::Duration;
use sumi_kv::cache::{Cache, CacheError, KvCache};
use sumi_kv::kv::{KeyValueStore, MemoryStore};
use sumi_kv::storage::{KvStorage, QueueStorage, StorageError, VisitedStorage};
use url::Url;

/// Creates an initialized storage over `store` under `prefix`
async fn create_storage(store: &MemoryStore, prefix: &str) -> KvStorage<MemoryStore> {
    let storage = KvStorage::with_client(store.clone(), prefix, None);
    storage.initialize().await.expect("in-memory store is always reachable");
    storage
}

fn url(s: &str) -> Url {
    Url::parse(s).expect("valid test URL")
}

#[tokio::test]
async fn test_cache_roundtrip_and_expiration() {
    let cache = KvCache::new(
        MemoryStore::new(),
        "redis:cache",
        Duration::from_millis(200),
    )
    .unwrap();
    let body = "Why doesn't the crawler support a redis cache?";

    cache.put("crawler", body.as_bytes()).await.unwrap();
    let cached = cache.get("crawler").await.unwrap();
    assert_eq!(String::from_utf8(cached).unwrap(), body);

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(matches!(
        cache.get("crawler").await,
        Err(CacheError::NotFound)
    ));
}

#[tokio::test]
async fn test_cache_put_resets_expiration() {
    let cache = KvCache::new(MemoryStore::new(), "c", Duration::from_millis(150)).unwrap();

    cache.put("page", b"v1").await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    cache.put("page", b"v2").await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    // 200ms after the first put, but only 100ms after the second
    assert_eq!(cache.get("page").await.unwrap(), b"v2".to_vec());
}

#[tokio::test]
async fn test_mark_visited_is_idempotent() {
    let storage = create_storage(&MemoryStore::new(), "crawl").await;

    storage.mark_visited(1234).await.unwrap();
    assert!(storage.is_visited(1234).await.unwrap());

    storage.mark_visited(1234).await.unwrap();
    assert!(storage.is_visited(1234).await.unwrap());
}

#[tokio::test]
async fn test_unvisited_request_is_false() {
    let storage = create_storage(&MemoryStore::new(), "crawl").await;

    assert!(!storage.is_visited(0).await.unwrap());
    assert!(!storage.is_visited(u64::MAX).await.unwrap());
}

#[tokio::test]
async fn test_cookie_overwrite() {
    let storage = create_storage(&MemoryStore::new(), "crawl").await;
    let page = url("https://example.com/");

    storage.set_cookies(&page, "a").await;
    storage.set_cookies(&page, "b").await;
    assert_eq!(storage.cookies(&page).await, "b");
}

#[tokio::test]
async fn test_concurrent_cookie_writers_leave_one_whole_value() {
    let storage = Arc::new(create_storage(&MemoryStore::new(), "crawl").await);
    let page = url("https://example.com/");

    let mut handles = Vec::new();
    for i in 0..16 {
        let storage = Arc::clone(&storage);
        let page = page.clone();
        handles.push(tokio::spawn(async move {
            storage
                .set_cookies(&page, &format!("session={}", i))
                .await;
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let cookies = storage.cookies(&page).await;
    let winner: u32 = cookies
        .strip_prefix("session=")
        .and_then(|n| n.parse().ok())
        .expect("cookie record holds one writer's full value");
    assert!(winner < 16);
}

#[tokio::test]
async fn test_queue_fifo_and_size() {
    let storage = create_storage(&MemoryStore::new(), "crawl").await;

    assert_eq!(storage.size().await.unwrap(), 0);
    storage.enqueue(b"first request").await.unwrap();
    storage.enqueue(b"second request").await.unwrap();
    assert_eq!(storage.size().await.unwrap(), 2);

    assert_eq!(storage.dequeue().await.unwrap(), b"first request".to_vec());
    assert_eq!(storage.size().await.unwrap(), 1);

    assert_eq!(storage.dequeue().await.unwrap(), b"second request".to_vec());
    assert_eq!(storage.size().await.unwrap(), 0);

    assert!(matches!(
        storage.dequeue().await,
        Err(StorageError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_clear_only_touches_its_prefix() {
    let store = MemoryStore::new();
    let storage = create_storage(&store, "P").await;
    let other = create_storage(&store, "P2").await;
    let page = url("https://example.com/");

    for s in [&storage, &other] {
        s.mark_visited(1).await.unwrap();
        s.set_cookies(&page, "k=v").await;
        s.enqueue(b"req").await.unwrap();
    }

    storage.clear().await.unwrap();

    assert!(!storage.is_visited(1).await.unwrap());
    assert_eq!(storage.cookies(&page).await, "");
    assert_eq!(storage.size().await.unwrap(), 0);

    assert!(other.is_visited(1).await.unwrap());
    assert_eq!(other.cookies(&page).await, "k=v");
    assert_eq!(other.size().await.unwrap(), 1);
}

#[tokio::test]
async fn test_clear_with_wildcard_prefix_keeps_other_prefixes() {
    let store = MemoryStore::new();
    let wildcard = create_storage(&store, "job*").await;
    let other = create_storage(&store, "job2").await;
    let page = url("https://example.com/");

    wildcard.mark_visited(1).await.unwrap();
    wildcard.set_cookies(&page, "w=1").await;
    other.mark_visited(1).await.unwrap();
    other.set_cookies(&page, "o=1").await;

    assert_eq!(wildcard.clear().await.unwrap(), 2);

    assert!(!wildcard.is_visited(1).await.unwrap());
    assert!(other.is_visited(1).await.unwrap());
    assert_eq!(other.cookies(&page).await, "o=1");
    assert_eq!(
        store.keys("*").await.unwrap(),
        vec!["job2:cookie:example.com", "job2:request:1"]
    );
}

#[tokio::test]
async fn test_clear_leaves_cache_entries_alone() {
    let store = MemoryStore::new();
    let storage = create_storage(&store, "P").await;
    let cache = KvCache::new(store.clone(), "P", Duration::from_secs(60)).unwrap();

    cache.put("page", b"body").await.unwrap();
    storage.mark_visited(1).await.unwrap();
    storage.clear().await.unwrap();

    assert_eq!(cache.get("page").await.unwrap(), b"body".to_vec());
}

#[tokio::test]
async fn test_namespace_isolation() {
    let store = MemoryStore::new();
    let a = create_storage(&store, "alpha").await;
    let b = create_storage(&store, "beta").await;
    let cache_a = KvCache::new(store.clone(), "alpha", Duration::from_secs(60)).unwrap();
    let cache_b = KvCache::new(store.clone(), "beta", Duration::from_secs(60)).unwrap();
    let page = url("https://example.com/");

    cache_a.put("page", b"from alpha").await.unwrap();
    a.mark_visited(9).await.unwrap();
    a.set_cookies(&page, "alpha=1").await;
    a.enqueue(b"alpha request").await.unwrap();

    assert!(cache_b.get("page").await.unwrap_err().is_not_found());
    assert!(!b.is_visited(9).await.unwrap());
    assert_eq!(b.cookies(&page).await, "");
    assert_eq!(b.size().await.unwrap(), 0);
    assert!(b.dequeue().await.unwrap_err().is_not_found());

    assert_eq!(a.size().await.unwrap(), 1);
    assert_eq!(store.llen("alpha:queue").await.unwrap(), 1);
}
