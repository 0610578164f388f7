//! Response translation
//!
//! Successful storage answers pass through with their status, headers and
//! body untouched. A backend error becomes its own status with the two-line
//! body `Error from S3: {code}\n{message}\n`. Parse failures carry only a
//! status.

use crate::auth::UNAUTHORIZED_BODY;
use crate::error::{BackendError, ParseError};
use crate::store::StoreOutput;
use bytes::Bytes;
use http::HeaderMap;

/// Response handed back to the HTTP host
#[derive(Debug, Clone, PartialEq)]
pub struct DavResponse {
    pub status: u16,
    pub body: Option<Bytes>,
    pub headers: Option<HeaderMap>,
}

impl DavResponse {
    /// Response with a status and nothing else
    #[must_use]
    pub const fn empty(status: u16) -> Self {
        Self {
            status,
            body: None,
            headers: None,
        }
    }

    /// The 401 sent when the credential does not match
    #[must_use]
    pub fn unauthorized() -> Self {
        Self {
            status: 401,
            body: Some(Bytes::from_static(UNAUTHORIZED_BODY.as_bytes())),
            headers: None,
        }
    }

    /// Body bytes, empty when there is none
    #[must_use]
    pub fn body_bytes(&self) -> &[u8] {
        self.body.as_deref().unwrap_or_default()
    }
}

impl From<ParseError> for DavResponse {
    fn from(err: ParseError) -> Self {
        Self::empty(err.status_code())
    }
}

impl From<StoreOutput> for DavResponse {
    fn from(out: StoreOutput) -> Self {
        Self {
            status: out.status,
            body: out.body,
            headers: out.headers,
        }
    }
}

impl From<BackendError> for DavResponse {
    fn from(err: BackendError) -> Self {
        Self {
            status: err.status,
            body: Some(Bytes::from(format!(
                "Error from S3: {}\n{}\n",
                err.code, err.message
            ))),
            headers: None,
        }
    }
}

/// Translate a storage result into a response
pub fn to_http(result: Result<StoreOutput, BackendError>) -> DavResponse {
    match result {
        Ok(out) => out.into(),
        Err(err) => err.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DestinationError;

    #[test]
    fn test_success_passthrough() {
        let mut headers = HeaderMap::new();
        headers.insert("etag", "\"abc\"".parse().unwrap());
        let out = StoreOutput::status(200)
            .with_body(Bytes::from_static(b"hello"))
            .with_headers(headers.clone());

        let resp = to_http(Ok(out));
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body_bytes(), b"hello");
        assert_eq!(resp.headers, Some(headers));
    }

    #[test]
    fn test_success_without_body_or_headers() {
        let resp = to_http(Ok(StoreOutput::status(204)));
        assert_eq!(resp, DavResponse::empty(204));
        assert!(resp.body_bytes().is_empty());
    }

    #[test]
    fn test_backend_error_body() {
        let resp = to_http(Err(BackendError::no_such_key()));
        assert_eq!(resp.status, 404);
        assert_eq!(
            resp.body_bytes(),
            b"Error from S3: NoSuchKey\nThe specified key does not exist.\n"
        );
        assert_eq!(resp.headers, None);
    }

    #[test]
    fn test_parse_failures() {
        let resp: DavResponse = ParseError::UnsupportedMethod("HEAD".into()).into();
        assert_eq!(resp, DavResponse::empty(405));

        let resp: DavResponse = ParseError::from(DestinationError::Missing).into();
        assert_eq!(resp, DavResponse::empty(400));
    }

    #[test]
    fn test_unauthorized() {
        let resp = DavResponse::unauthorized();
        assert_eq!(resp.status, 401);
        assert_eq!(resp.body_bytes(), b"Incorrect HTTP Auth\n");
    }
}
