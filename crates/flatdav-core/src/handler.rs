//! Request handler
//!
//! Runs one request through auth, parsing, execution and translation.
//! The first failing stage produces the response.

use crate::auth::Credential;
use crate::error::{Error, Result, StoreError};
use crate::executor::execute;
use crate::op::parse_operation;
use crate::response::{DavResponse, to_http};
use crate::store::ObjectStore;
use bytes::Bytes;
use http::{HeaderMap, Method};
use std::sync::Arc;
use tracing::{info, warn};

/// A request as seen by FlatDav, independent of the HTTP host
#[derive(Debug, Clone)]
pub struct DavRequest {
    pub method: Method,
    /// Routed key (the last path segment)
    pub key: String,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// Full URL the client requested, used to validate MOVE destinations
    pub url: String,
}

impl DavRequest {
    /// Create a request without headers or body
    pub fn new(method: Method, key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method,
            key: key.into(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            url: url.into(),
        }
    }

    /// Set headers
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Set body
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}

/// Handler holding the process-wide credential and store
pub struct DavHandler<S: ObjectStore + ?Sized = dyn ObjectStore> {
    credential: Credential,
    store: Arc<S>,
}

impl<S: ObjectStore + ?Sized> DavHandler<S> {
    /// Create a new handler
    pub fn new(credential: Credential, store: Arc<S>) -> Self {
        Self { credential, store }
    }

    /// Get a reference to the store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Check a request's `Authorization` header against the credential
    pub fn authorize(&self, headers: &HeaderMap) -> bool {
        self.credential.authorize(headers)
    }

    /// Handle one request
    ///
    /// Auth, parse and backend failures become responses. Only a
    /// [`StoreError::Fault`] is returned as an error.
    pub async fn handle(&self, request: DavRequest) -> Result<DavResponse> {
        info!(method = %request.method, key = %request.key, "processing request");

        if !self.authorize(&request.headers) {
            info!(method = %request.method, key = %request.key, "rejected: bad credentials");
            return Ok(DavResponse::unauthorized());
        }

        let DavRequest {
            method,
            key,
            headers,
            body,
            url,
        } = request;

        let op = match parse_operation(&method, &key, &headers, body, &url) {
            Ok(op) => op,
            Err(e) => {
                info!(method = %method, key = %key, "rejected: {}", e);
                return Ok(e.into());
            }
        };

        match execute(self.store.as_ref(), op).await {
            Ok(out) => Ok(to_http(Ok(out))),
            Err(StoreError::Backend(e)) => {
                info!(
                    store = self.store.name(),
                    code = %e.code,
                    status = e.status,
                    "Error from S3: {}",
                    e.message
                );
                Ok(to_http(Err(e)))
            }
            Err(StoreError::Fault(msg)) => {
                warn!(store = self.store.name(), "storage fault: {}", msg);
                Err(Error::Fault(msg))
            }
        }
    }
}
