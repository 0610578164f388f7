//! HTTP basic auth gate
//!
//! The credential is computed once from the configured user and password.
//! Every request's `Authorization` header must match it exactly.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use http::HeaderMap;
use http::header::AUTHORIZATION;
use std::fmt;

/// Body returned with every 401
pub const UNAUTHORIZED_BODY: &str = "Incorrect HTTP Auth\n";

/// Expected `Authorization` header value
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    header: String,
}

impl Credential {
    /// Build the `Basic <base64(user:password)>` credential
    #[must_use]
    pub fn basic(user: &str, password: &str) -> Self {
        let encoded = BASE64.encode(format!("{user}:{password}"));
        Self {
            header: format!("Basic {encoded}"),
        }
    }

    /// The full header value clients must send
    #[must_use]
    pub fn header_value(&self) -> &str {
        &self.header
    }

    /// Check a request's headers against this credential
    ///
    /// The comparison is byte-exact and case-sensitive, scheme included.
    /// A missing header never matches.
    #[must_use]
    pub fn authorize(&self, headers: &HeaderMap) -> bool {
        headers
            .get(AUTHORIZATION)
            .is_some_and(|value| value.as_bytes() == self.header.as_bytes())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}
