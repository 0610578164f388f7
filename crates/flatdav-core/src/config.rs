//! Configuration types for FlatDav
//!
//! Everything here is read once at startup and never mutated afterwards.

use crate::auth::Credential;
use crate::error::ConfigError;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

/// Default maximum accepted request body (100 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 100 * 1024 * 1024;

/// Default region when talking to AWS without a custom endpoint
pub const DEFAULT_REGION: &str = "us-west-2";

/// Root configuration for a FlatDav process
#[derive(Clone, Debug)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Basic auth credentials
    pub auth: AuthConfig,
    /// Object store backend
    pub backend: BackendConfig,
}

impl Config {
    /// Check that every required value is present and well formed
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.auth.validate()?;
        self.backend.validate()
    }
}

/// HTTP server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen address
    pub listen: SocketAddr,
    /// Prefix the key routes are mounted under (empty for the root)
    pub base_path: String,
    /// Scheme used to rebuild the request URL when no X-Forwarded-Proto is sent
    pub default_scheme: String,
    /// Maximum request body size in bytes
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 7071)),
            base_path: String::new(),
            default_scheme: "http".to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ServerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_path.is_empty()
            && (!self.base_path.starts_with('/') || self.base_path.ends_with('/'))
        {
            return Err(ConfigError::InvalidBasePath(self.base_path.clone()));
        }
        match self.default_scheme.as_str() {
            "http" | "https" => Ok(()),
            other => Err(ConfigError::InvalidScheme(other.to_string())),
        }
    }
}

/// HTTP basic auth configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub user: String,
    pub password: String,
}

impl AuthConfig {
    /// Create a new auth configuration
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.user.is_empty() {
            return Err(ConfigError::Missing("HTTP_BASIC_AUTH_USER"));
        }
        if self.password.is_empty() {
            return Err(ConfigError::Missing("HTTP_BASIC_AUTH_PASS"));
        }
        Ok(())
    }

    /// Derive the credential clients must present
    #[must_use]
    pub fn credential(&self) -> Credential {
        Credential::basic(&self.user, &self.password)
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Which object store serves requests
#[derive(Clone, Debug)]
pub enum BackendConfig {
    /// S3-compatible object storage
    S3(S3Config),
    /// Process-local store, contents lost on exit (development only)
    Memory,
}

impl BackendConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::S3(s3) => s3.validate(),
            Self::Memory => Ok(()),
        }
    }

    /// Short backend name for logging
    #[must_use]
    pub const fn kind(&self) -> BackendKind {
        match self {
            Self::S3(_) => BackendKind::S3,
            Self::Memory => BackendKind::Memory,
        }
    }
}

/// Backend selector as given on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    S3,
    Memory,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::S3 => "s3",
            BackendKind::Memory => "memory",
        }
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "s3" => Ok(Self::S3),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// S3 backend configuration
#[derive(Clone, Debug)]
pub struct S3Config {
    /// Custom endpoint URL (MinIO, Azurite-style emulators); AWS when unset
    pub endpoint: Option<String>,
    /// Region name
    pub region: String,
    /// Bucket holding every key
    pub bucket: String,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            endpoint: None,
            region: DEFAULT_REGION.to_string(),
            bucket: String::new(),
        }
    }
}

impl S3Config {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.bucket.is_empty() {
            return Err(ConfigError::Missing("S3_BUCKET"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            server: ServerConfig::default(),
            auth: AuthConfig::new("alice", "secret"),
            backend: BackendConfig::S3(S3Config {
                bucket: "files".to_string(),
                ..S3Config::default()
            }),
        }
    }

    #[test]
    fn test_default_config() {
        let server = ServerConfig::default();
        assert_eq!(server.listen.port(), 7071);
        assert_eq!(server.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
        assert_eq!(S3Config::default().region, "us-west-2");
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_missing_values() {
        let mut cfg = config();
        cfg.backend = BackendConfig::S3(S3Config::default());
        assert_eq!(cfg.validate(), Err(ConfigError::Missing("S3_BUCKET")));

        let mut cfg = config();
        cfg.auth.user.clear();
        assert_eq!(cfg.validate(), Err(ConfigError::Missing("HTTP_BASIC_AUTH_USER")));

        let mut cfg = config();
        cfg.auth.password.clear();
        assert_eq!(cfg.validate(), Err(ConfigError::Missing("HTTP_BASIC_AUTH_PASS")));
    }

    #[test]
    fn test_only_unset_auth_values_fail() {
        let mut cfg = config();
        cfg.auth.user = "team:alice".to_string();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_memory_backend_needs_no_bucket() {
        let mut cfg = config();
        cfg.backend = BackendConfig::Memory;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_invalid_server_values() {
        let mut cfg = config();
        cfg.server.base_path = "api/".to_string();
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidBasePath(_))));

        let mut cfg = config();
        cfg.server.default_scheme = "ftp".to_string();
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidScheme(_))));
    }

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!("s3".parse::<BackendKind>(), Ok(BackendKind::S3));
        assert_eq!("memory".parse::<BackendKind>(), Ok(BackendKind::Memory));
        assert!("gcs".parse::<BackendKind>().is_err());
    }

    #[test]
    fn test_auth_debug_redacts_password() {
        let rendered = format!("{:?}", AuthConfig::new("alice", "hunter2"));
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
    }
}
