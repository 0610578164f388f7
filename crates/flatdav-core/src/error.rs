//! Error types for FlatDav
//!
//! Each request stage has its own error type. Only [`BackendError`] is ever
//! formatted into a response body; everything else maps to a fixed status.

use thiserror::Error;

/// Common result type for FlatDav operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that escape the request handler
///
/// These are not recoverable at the request level. The host turns them
/// into a generic 500 response.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unexpected storage fault: {0}")]
    Fault(String),
}

/// Failure to turn an HTTP request into an operation
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("method not allowed: {0}")]
    UnsupportedMethod(String),

    #[error("invalid destination: {0}")]
    InvalidDestination(#[from] DestinationError),
}

impl ParseError {
    /// Get the HTTP status code for this failure
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::UnsupportedMethod(_) => 405,
            Self::InvalidDestination(_) => 400,
        }
    }
}

/// Reasons a MOVE `Destination` header is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DestinationError {
    #[error("missing Destination header")]
    Missing,

    #[error("Destination header is not valid UTF-8")]
    NotUtf8,

    #[error("Destination does not name a key")]
    EmptyKey,

    #[error("Destination key contains reserved character {0:?}")]
    ReservedCharacter(char),

    #[error("Destination {expected} is not a sibling of the request (reconstructed {actual})")]
    NotSibling { expected: String, actual: String },
}

/// Error reported by the object-storage backend
///
/// Carries the backend's machine-readable code, its human message and the
/// HTTP status it answered with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code} ({status}): {message}")]
pub struct BackendError {
    pub code: String,
    pub message: String,
    pub status: u16,
}

impl BackendError {
    /// Create a new backend error
    pub fn new(code: impl Into<String>, message: impl Into<String>, status: u16) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            status,
        }
    }

    /// The canonical missing-key error
    pub fn no_such_key() -> Self {
        Self::new("NoSuchKey", "The specified key does not exist.", 404)
    }

    /// Check if this is a not found error
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// Errors returned by an [`ObjectStore`](crate::store::ObjectStore)
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend answered with an error response
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// Anything that is not a well-formed backend answer (transport failure,
    /// malformed response, signing problem)
    #[error("storage fault: {0}")]
    Fault(String),
}

impl StoreError {
    /// Create a new fault
    pub fn fault(msg: impl Into<String>) -> Self {
        Self::Fault(msg.into())
    }
}

/// Startup configuration problems
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("base path {0:?} must start with '/' and must not end with '/'")]
    InvalidBasePath(String),

    #[error("unsupported URL scheme {0:?}, expected http or https")]
    InvalidScheme(String),

    #[error("unknown backend {0:?}, expected s3 or memory")]
    UnknownBackend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_status() {
        assert_eq!(ParseError::UnsupportedMethod("HEAD".into()).status_code(), 405);
        assert_eq!(
            ParseError::InvalidDestination(DestinationError::Missing).status_code(),
            400
        );
    }

    #[test]
    fn test_backend_error_not_found() {
        assert!(BackendError::no_such_key().is_not_found());
        assert!(!BackendError::new("AccessDenied", "Access Denied", 403).is_not_found());
    }

    #[test]
    fn test_store_error_from_backend() {
        let err: StoreError = BackendError::no_such_key().into();
        assert!(matches!(err, StoreError::Backend(ref e) if e.code == "NoSuchKey"));
    }
}
