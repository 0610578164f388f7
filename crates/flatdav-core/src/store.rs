//! Object store abstraction
//!
//! The backend is a flat key/blob store. Implementations answer with the
//! status, headers and body the backend produced so they can be passed
//! through to the client unchanged.

use crate::error::StoreError;
use async_trait::async_trait;
use bytes::Bytes;
use http::HeaderMap;

/// Successful backend answer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreOutput {
    /// HTTP status reported by the backend
    pub status: u16,
    /// Object bytes (GET only)
    pub body: Option<Bytes>,
    /// Response headers reported by the backend
    pub headers: Option<HeaderMap>,
}

impl StoreOutput {
    /// Output with only a status
    #[must_use]
    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: None,
            headers: None,
        }
    }

    /// Attach a body
    #[must_use]
    pub fn with_body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach headers
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }
}

/// Result type for store calls
pub type StoreResult<T = StoreOutput> = std::result::Result<T, StoreError>;

/// Capabilities FlatDav needs from object storage
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Get the store name (for logging)
    fn name(&self) -> &str;

    /// Fetch a whole object
    async fn get(&self, key: &str) -> StoreResult;

    /// Store a whole object, replacing any existing one
    async fn put(&self, key: &str, body: Bytes) -> StoreResult;

    /// Remove an object
    async fn delete(&self, key: &str) -> StoreResult;

    /// Server-side copy of `from` to `to`
    async fn copy(&self, from: &str, to: &str) -> StoreResult;
}
