//! S3 error mapping

use flatdav_core::{BackendError, StoreError};
use s3::error::S3Error;
use serde::Deserialize;
use thiserror::Error;

/// Code used when the backend's error body cannot be parsed
pub const UNKNOWN_ERROR_CODE: &str = "UnknownError";

/// Failures while building the S3 client
#[derive(Debug, Error)]
pub enum S3SetupError {
    #[error("invalid region {region}: {reason}")]
    Region { region: String, reason: String },

    #[error("failed to load credentials: {0}")]
    Credentials(String),

    #[error("failed to create bucket handle: {0}")]
    Bucket(#[from] S3Error),
}

/// S3 `<Error>` response document
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ErrorDocument {
    code: String,
    #[serde(default)]
    message: String,
}

/// Build a backend error from a failed response
///
/// S3 answers failures with an XML `<Error>` document. When the body is
/// something else the raw text becomes the message.
pub fn backend_error(status: u16, body: &str) -> BackendError {
    match quick_xml::de::from_str::<ErrorDocument>(body) {
        Ok(doc) => BackendError::new(doc.code, doc.message, status),
        Err(_) => {
            let message = match body.trim() {
                "" => http::StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("no error details")
                    .to_string(),
                text => text.to_string(),
            };
            BackendError::new(UNKNOWN_ERROR_CODE, message, status)
        }
    }
}

/// Classify a client error
///
/// Only a completed request with a non-2xx status is a backend error;
/// transport, signing and credential problems are faults.
pub fn map_s3_error(err: S3Error) -> StoreError {
    match err {
        S3Error::HttpFailWithBody(status, body) => backend_error(status, &body).into(),
        other => StoreError::fault(other.to_string()),
    }
}
