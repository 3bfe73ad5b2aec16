//! In-process store backend
//!
//! `MemoryStore` mirrors the Redis semantics the adapters rely on: string
//! values with optional expiration, lists, glob key enumeration, and
//! WRONGTYPE errors when a command hits a key of the other kind. Expired keys
//! are dropped lazily on access.
//!
//! Clones share the same data, so two adapters built over clones of one
//! `MemoryStore` behave like two clients of the same server.

use crate::kv::pattern::matches_glob;
use crate::kv::traits::{Connect, KeyValueStore, StoreError, StoreResult};
use crate::kv::ConnectionOptions;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug, Clone)]
enum Value {
    Bytes(Vec<u8>),
    List(VecDeque<Vec<u8>>),
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// In-memory key-value store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.lock().await;
        entries.values().filter(|e| !e.is_expired(now)).count()
    }

    /// Returns true if the store holds no live keys
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Looks up a live entry, evicting it first if it has expired
fn live_entry<'a>(entries: &'a mut HashMap<String, Entry>, key: &str) -> Option<&'a mut Entry> {
    let expired = entries
        .get(key)
        .is_some_and(|entry| entry.is_expired(Instant::now()));
    if expired {
        entries.remove(key);
        return None;
    }
    entries.get_mut(key)
}

fn wrong_type(key: &str) -> StoreError {
    StoreError::WrongType {
        key: key.to_string(),
    }
}

impl Connect for MemoryStore {
    async fn connect(_options: &ConnectionOptions) -> StoreResult<Self> {
        Ok(Self::new())
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let mut entries = self.entries.lock().await;
        match live_entry(&mut entries, key) {
            None => Ok(None),
            Some(Entry {
                value: Value::Bytes(bytes),
                ..
            }) => Ok(Some(bytes.clone())),
            Some(_) => Err(wrong_type(key)),
        }
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> StoreResult<()> {
        let mut entries = self.entries.lock().await;
        entries.insert(
            key.to_string(),
            Entry {
                value: Value::Bytes(value.to_vec()),
                // Expirations past the clock's range never expire
                expires_at: ttl.and_then(|ttl| Instant::now().checked_add(ttl)),
            },
        );
        Ok(())
    }

    async fn del(&self, keys: &[String]) -> StoreResult<u64> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        let mut deleted = 0;
        for key in keys {
            if let Some(entry) = entries.remove(key) {
                if !entry.is_expired(now) {
                    deleted += 1;
                }
            }
        }
        Ok(deleted)
    }

    async fn keys(&self, pattern: &str) -> StoreResult<Vec<String>> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        entries.retain(|_, entry| !entry.is_expired(now));

        let mut keys: Vec<String> = entries
            .keys()
            .filter(|key| matches_glob(pattern, key))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn rpush(&self, key: &str, value: &[u8]) -> StoreResult<u64> {
        let mut entries = self.entries.lock().await;
        match live_entry(&mut entries, key) {
            Some(Entry {
                value: Value::List(list),
                ..
            }) => {
                list.push_back(value.to_vec());
                Ok(list.len() as u64)
            }
            Some(_) => Err(wrong_type(key)),
            None => {
                entries.insert(
                    key.to_string(),
                    Entry {
                        value: Value::List(VecDeque::from([value.to_vec()])),
                        expires_at: None,
                    },
                );
                Ok(1)
            }
        }
    }

    async fn lpop(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let mut entries = self.entries.lock().await;
        let (head, now_empty) = match live_entry(&mut entries, key) {
            None => return Ok(None),
            Some(Entry {
                value: Value::List(list),
                ..
            }) => {
                let head = list.pop_front();
                (head, list.is_empty())
            }
            Some(_) => return Err(wrong_type(key)),
        };

        // Lists disappear once their last element is popped
        if now_empty {
            entries.remove(key);
        }
        Ok(head)
    }

    async fn llen(&self, key: &str) -> StoreResult<u64> {
        let mut entries = self.entries.lock().await;
        match live_entry(&mut entries, key) {
            None => Ok(0),
            Some(Entry {
                value: Value::List(list),
                ..
            }) => Ok(list.len() as u64),
            Some(_) => Err(wrong_type(key)),
        }
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
