//! Storage traits and error types
//!
//! This module defines the interfaces the crawler consumes for its
//! persistent state and the associated error types.

use crate::kv::StoreError;
use std::future::Future;
use thiserror::Error;
use url::Url;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage used before initialize()")]
    NotInitialized,

    #[error("Store connection error: {0}")]
    Connection(String),

    /// The requested item does not exist (e.g. popping an empty queue)
    #[error("not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Visited-request and cookie storage consumed by the crawler
///
/// The cookie methods have no error channel: implementations log failures
/// and report "no cookies". Callers that need to tell the two apart should
/// use the fallible methods of the concrete type.
pub trait VisitedStorage: Send + Sync {
    /// Prepares the storage for use; must succeed before any other call
    fn initialize(&self) -> impl Future<Output = StorageResult<()>> + Send;

    /// Records a request as visited
    fn mark_visited(&self, request_id: u64) -> impl Future<Output = StorageResult<()>> + Send;

    /// Returns true if the request has been marked visited
    fn is_visited(&self, request_id: u64) -> impl Future<Output = StorageResult<bool>> + Send;

    /// Cookies stored for the URL's host, or an empty string
    fn cookies(&self, url: &Url) -> impl Future<Output = String> + Send;

    /// Replaces the cookies stored for the URL's host
    fn set_cookies(&self, url: &Url, cookies: &str) -> impl Future<Output = ()> + Send;
}

/// FIFO queue of serialized requests waiting to be fetched
pub trait QueueStorage: Send + Sync {
    /// Appends a request to the tail of the queue
    fn enqueue(&self, request: &[u8]) -> impl Future<Output = StorageResult<()>> + Send;

    /// Removes and returns the request at the head of the queue
    ///
    /// Returns [`StorageError::NotFound`] when the queue is empty.
    fn dequeue(&self) -> impl Future<Output = StorageResult<Vec<u8>>> + Send;

    /// Number of queued requests
    fn size(&self) -> impl Future<Output = StorageResult<usize>> + Send;
}
