//! S3-backed object store

use crate::error::{S3SetupError, map_s3_error};
use async_trait::async_trait;
use bytes::Bytes;
use flatdav_core::config::S3Config;
use flatdav_core::{ObjectStore, StoreOutput, StoreResult};
use http::header::{HeaderMap, HeaderName, HeaderValue};
use s3::Bucket;
use s3::creds::Credentials;
use s3::region::Region;
use std::collections::HashMap;
use tracing::{debug, info};

/// Object store over a single S3 bucket
pub struct S3Store {
    bucket: Box<Bucket>,
}

impl S3Store {
    /// Connect using credentials from the standard AWS sources
    /// (environment, profile, instance metadata)
    pub fn new(config: &S3Config) -> Result<Self, S3SetupError> {
        let credentials =
            Credentials::default().map_err(|e| S3SetupError::Credentials(e.to_string()))?;
        Self::with_credentials(config, credentials)
    }

    /// Connect with explicit credentials
    pub fn with_credentials(
        config: &S3Config,
        credentials: Credentials,
    ) -> Result<Self, S3SetupError> {
        let region = match &config.endpoint {
            Some(endpoint) => Region::Custom {
                region: config.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config
                .region
                .parse::<Region>()
                .map_err(|e| S3SetupError::Region {
                    region: config.region.clone(),
                    reason: e.to_string(),
                })?,
        };

        let mut bucket = Bucket::new(&config.bucket, region, credentials)?;
        // Emulators and self-hosted endpoints rarely support virtual-host addressing
        if config.endpoint.is_some() {
            bucket = bucket.with_path_style();
        }

        info!(
            bucket = %config.bucket,
            region = %config.region,
            endpoint = config.endpoint.as_deref().unwrap_or("aws"),
            "S3 store ready"
        );
        Ok(Self { bucket })
    }

    /// Bucket name
    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }
}

/// Convert the client's header map, dropping anything that is not a valid header
pub fn to_header_map(headers: &HashMap<String, String>) -> HeaderMap {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                map.append(name, value);
            }
            _ => debug!(header = %name, "dropping unrepresentable response header"),
        }
    }
    map
}

#[async_trait]
impl ObjectStore for S3Store {
    fn name(&self) -> &str {
        "s3"
    }

    async fn get(&self, key: &str) -> StoreResult {
        let response = self.bucket.get_object(key).await.map_err(map_s3_error)?;
        Ok(StoreOutput::status(response.status_code())
            .with_body(response.bytes().clone())
            .with_headers(to_header_map(&response.headers())))
    }

    async fn put(&self, key: &str, body: Bytes) -> StoreResult {
        let response = self
            .bucket
            .put_object(key, &body)
            .await
            .map_err(map_s3_error)?;
        Ok(StoreOutput::status(response.status_code())
            .with_headers(to_header_map(&response.headers())))
    }

    async fn delete(&self, key: &str) -> StoreResult {
        let response = self
            .bucket
            .delete_object(key)
            .await
            .map_err(map_s3_error)?;
        Ok(StoreOutput::status(response.status_code())
            .with_headers(to_header_map(&response.headers())))
    }

    async fn copy(&self, from: &str, to: &str) -> StoreResult {
        // x-amz-copy-source is sent verbatim, so the key must be encoded here
        let source = urlencoding::encode(from);
        let status = self
            .bucket
            .copy_object_internal(&*source, to)
            .await
            .map_err(map_s3_error)?;
        Ok(StoreOutput::status(status))
    }
}
