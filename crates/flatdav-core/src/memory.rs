//! In-memory object store
//!
//! Behaves like S3 for the four calls FlatDav issues: missing keys answer
//! `NoSuchKey`/404, deletes always succeed with 204, objects carry an MD5
//! ETag. Used by tests and by the gateway's development mode.

use crate::error::BackendError;
use crate::store::{ObjectStore, StoreOutput, StoreResult};
use async_trait::async_trait;
use bytes::Bytes;
use http::header::{CONTENT_LENGTH, ETAG, HeaderMap, HeaderValue};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// Process-local object store
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<HashMap<String, Bytes>>,
    /// Number of store calls served, failures included
    calls: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of get/put/delete/copy calls made so far
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    /// Check whether a key exists (does not count as a call)
    pub fn contains(&self, key: &str) -> bool {
        self.objects.read().contains_key(key)
    }

    /// Read an object directly (does not count as a call)
    pub fn object(&self, key: &str) -> Option<Bytes> {
        self.objects.read().get(key).cloned()
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    fn record(&self, call: &str, key: &str) {
        self.calls.fetch_add(1, Ordering::Relaxed);
        trace!(call, key, "memory store call");
    }
}

fn etag(body: &[u8]) -> HeaderValue {
    let digest = format!("\"{:x}\"", md5::compute(body));
    HeaderValue::from_str(&digest).unwrap_or_else(|_| HeaderValue::from_static("\"\""))
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &str) -> StoreResult {
        self.record("get", key);
        let body = self
            .objects
            .read()
            .get(key)
            .cloned()
            .ok_or_else(BackendError::no_such_key)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
        headers.insert(ETAG, etag(&body));
        Ok(StoreOutput::status(200)
            .with_body(body)
            .with_headers(headers))
    }

    async fn put(&self, key: &str, body: Bytes) -> StoreResult {
        self.record("put", key);
        let mut headers = HeaderMap::new();
        headers.insert(ETAG, etag(&body));
        self.objects.write().insert(key.to_string(), body);
        Ok(StoreOutput::status(200).with_headers(headers))
    }

    async fn delete(&self, key: &str) -> StoreResult {
        self.record("delete", key);
        self.objects.write().remove(key);
        Ok(StoreOutput::status(204))
    }

    async fn copy(&self, from: &str, to: &str) -> StoreResult {
        self.record("copy", from);
        let mut objects = self.objects.write();
        let body = objects
            .get(from)
            .cloned()
            .ok_or_else(BackendError::no_such_key)?;
        objects.insert(to.to_string(), body);
        Ok(StoreOutput::status(200))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    #[tokio::test]
    async fn test_put_get() {
        let store = MemoryStore::new();
        store.put("a.txt", Bytes::from_static(b"hello")).await.unwrap();

        let out = store.get("a.txt").await.unwrap();
        assert_eq!(out.status, 200);
        assert_eq!(out.body, Some(Bytes::from_static(b"hello")));
        let headers = out.headers.unwrap();
        assert_eq!(headers[CONTENT_LENGTH], "5");
        assert_eq!(headers[ETAG], "\"5d41402abc4b2a76b9719d911017c592\"");
        assert_eq!(store.calls(), 2);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = MemoryStore::new();
        let err = store.get("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(ref e) if e.is_not_found()));
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_succeeds() {
        let store = MemoryStore::new();
        assert_eq!(store.delete("nope").await.unwrap().status, 204);
        assert_eq!(store.delete("nope").await.unwrap().status, 204);
    }

    #[tokio::test]
    async fn test_copy() {
        let store = MemoryStore::new();
        store.put("a", Bytes::from_static(b"x")).await.unwrap();
        store.copy("a", "b").await.unwrap();
        assert_eq!(store.object("b"), Some(Bytes::from_static(b"x")));
        assert!(store.contains("a"));
        assert_eq!(store.len(), 2);

        let err = store.copy("missing", "c").await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(ref e) if e.code == "NoSuchKey"));
        assert!(!store.contains("c"));
    }
}
