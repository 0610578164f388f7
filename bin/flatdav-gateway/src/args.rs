//! Command line and environment configuration

use clap::Parser;
use flatdav_core::config::{
    AuthConfig, BackendConfig, BackendKind, Config, DEFAULT_MAX_BODY_BYTES, DEFAULT_REGION,
    S3Config, ServerConfig,
};
use flatdav_core::error::ConfigError;
use std::net::SocketAddr;

#[derive(Parser, Debug)]
#[command(name = "flatdav-gateway")]
#[command(about = "WebDAV-style gateway over a flat S3 bucket")]
#[command(version)]
pub struct Args {
    /// Listen address
    #[arg(short, long, env = "FLATDAV_LISTEN", default_value = "0.0.0.0:7071")]
    pub listen: SocketAddr,

    /// Path prefix for key routes, e.g. /api/flatdav (empty serves from the root)
    #[arg(long, env = "FLATDAV_BASE_PATH", default_value = "")]
    pub base_path: String,

    /// Storage backend: s3, or memory for local development
    #[arg(long, env = "FLATDAV_BACKEND", default_value = "s3")]
    pub backend: BackendKind,

    /// Custom S3 endpoint (MinIO and friends); AWS when unset
    #[arg(long, env = "AWS_S3_ENDPOINT")]
    pub endpoint: Option<String>,

    /// S3 region
    #[arg(long, env = "AWS_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// Bucket holding all keys
    #[arg(long, env = "S3_BUCKET")]
    pub bucket: Option<String>,

    /// HTTP basic auth user
    #[arg(long, env = "HTTP_BASIC_AUTH_USER")]
    pub user: Option<String>,

    /// HTTP basic auth password
    #[arg(long, env = "HTTP_BASIC_AUTH_PASS", hide_env_values = true)]
    pub password: Option<String>,

    /// Scheme assumed for the request URL when X-Forwarded-Proto is absent
    #[arg(long, env = "FLATDAV_DEFAULT_SCHEME", default_value = "http")]
    pub default_scheme: String,

    /// Maximum request body size in bytes
    #[arg(long, env = "FLATDAV_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Build and validate the process configuration
    pub fn into_config(self) -> Result<Config, ConfigError> {
        let backend = match self.backend {
            BackendKind::S3 => BackendConfig::S3(S3Config {
                endpoint: self.endpoint.filter(|e| !e.is_empty()),
                region: self.region,
                bucket: self.bucket.unwrap_or_default(),
            }),
            BackendKind::Memory => BackendConfig::Memory,
        };

        let config = Config {
            server: ServerConfig {
                listen: self.listen,
                base_path: self.base_path,
                default_scheme: self.default_scheme,
                max_body_bytes: self.max_body_bytes,
            },
            auth: AuthConfig::new(
                self.user.unwrap_or_default(),
                self.password.unwrap_or_default(),
            ),
            backend,
        };
        config.validate()?;
        Ok(config)
    }
}
