//! Operation parsing
//!
//! Maps an HTTP method, the routed key, headers, body and the full request
//! URL into one [`Operation`]. Nothing here touches storage.

use crate::error::{DestinationError, ParseError};
use bytes::Bytes;
use http::{HeaderMap, Method};
use std::fmt;
use tracing::debug;

/// Header naming the target of a MOVE
pub const DESTINATION: &str = "destination";

/// Characters that make a derived destination key ambiguous
const RESERVED_KEY_CHARS: [char; 3] = ['?', '#', '%'];

/// The methods FlatDav understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DavMethod {
    Get,
    Put,
    Delete,
    Move,
}

impl DavMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DavMethod::Get => "GET",
            DavMethod::Put => "PUT",
            DavMethod::Delete => "DELETE",
            DavMethod::Move => "MOVE",
        }
    }
}

impl TryFrom<&Method> for DavMethod {
    type Error = ParseError;

    fn try_from(method: &Method) -> Result<Self, Self::Error> {
        match method.as_str() {
            "GET" => Ok(Self::Get),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "MOVE" => Ok(Self::Move),
            other => Err(ParseError::UnsupportedMethod(other.to_string())),
        }
    }
}

impl fmt::Display for DavMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single request intent against the flat key namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Get { key: String },
    Delete { key: String },
    Put { key: String, body: Bytes },
    Move { from: String, to: String },
}

impl Operation {
    /// The method this operation was parsed from
    #[must_use]
    pub const fn method(&self) -> DavMethod {
        match self {
            Self::Get { .. } => DavMethod::Get,
            Self::Delete { .. } => DavMethod::Delete,
            Self::Put { .. } => DavMethod::Put,
            Self::Move { .. } => DavMethod::Move,
        }
    }
}

/// Parse a request into an operation
///
/// `key` is the routed path segment, `request_url` the full URL the client
/// used (scheme, host, path and query). Only MOVE looks at headers and URL.
pub fn parse_operation(
    method: &Method,
    key: &str,
    headers: &HeaderMap,
    body: Bytes,
    request_url: &str,
) -> Result<Operation, ParseError> {
    let op = match DavMethod::try_from(method)? {
        DavMethod::Get => Operation::Get {
            key: key.to_string(),
        },
        DavMethod::Delete => Operation::Delete {
            key: key.to_string(),
        },
        DavMethod::Put => Operation::Put {
            key: key.to_string(),
            body,
        },
        DavMethod::Move => {
            let destination = headers
                .get(DESTINATION)
                .ok_or(DestinationError::Missing)?
                .to_str()
                .map_err(|_| DestinationError::NotUtf8)?;
            Operation::Move {
                from: key.to_string(),
                to: destination_key(destination, request_url)?,
            }
        }
    };
    Ok(op)
}

/// Derive the target key of a MOVE from its `Destination` header
///
/// The namespace is flat, so the key is whatever follows the last `/`. The
/// header must then be exactly the request URL with its last segment
/// replaced by that key; anything else (another host, another scheme, extra
/// path segments) is rejected rather than collapsed.
pub fn destination_key(destination: &str, request_url: &str) -> Result<String, DestinationError> {
    let key = match destination.rfind('/') {
        Some(idx) => &destination[idx + 1..],
        None => destination,
    };
    if key.is_empty() {
        return Err(DestinationError::EmptyKey);
    }
    if let Some(c) = key.chars().find(|c| RESERVED_KEY_CHARS.contains(c)) {
        return Err(DestinationError::ReservedCharacter(c));
    }

    let base = match request_url.rfind('/') {
        Some(idx) => &request_url[..idx],
        None => "",
    };
    let rebuilt = format!("{base}/{key}");
    if rebuilt != destination {
        debug!(
            expected = %destination,
            actual = %rebuilt,
            "Destination header does not name a sibling of the request"
        );
        return Err(DestinationError::NotSibling {
            expected: destination.to_string(),
            actual: rebuilt,
        });
    }

    Ok(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn move_headers(destination: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(DESTINATION, destination.parse().unwrap());
        headers
    }

    #[test]
    fn test_simple_methods() {
        let headers = HeaderMap::new();
        let url = "https://host/a.txt";

        let op = parse_operation(&Method::GET, "a.txt", &headers, Bytes::new(), url).unwrap();
        assert_eq!(op, Operation::Get { key: "a.txt".into() });

        let op = parse_operation(&Method::DELETE, "a.txt", &headers, Bytes::new(), url).unwrap();
        assert_eq!(op, Operation::Delete { key: "a.txt".into() });

        let body = Bytes::from_static(b"hello");
        let op = parse_operation(&Method::PUT, "a.txt", &headers, body.clone(), url).unwrap();
        assert_eq!(op, Operation::Put { key: "a.txt".into(), body });
    }

    #[test]
    fn test_unsupported_methods() {
        let headers = HeaderMap::new();
        for method in [
            Method::HEAD,
            Method::POST,
            Method::OPTIONS,
            Method::from_bytes(b"PROPFIND").unwrap(),
            Method::from_bytes(b"COPY").unwrap(),
            Method::from_bytes(b"move").unwrap(),
        ] {
            let err = parse_operation(&method, "a.txt", &headers, Bytes::new(), "https://host/a.txt")
                .unwrap_err();
            assert!(matches!(err, ParseError::UnsupportedMethod(ref m) if m == method.as_str()));
            assert_eq!(err.status_code(), 405);
        }
    }

    #[test]
    fn test_move_to_sibling() {
        let method = Method::from_bytes(b"MOVE").unwrap();
        let op = parse_operation(
            &method,
            "a.txt",
            &move_headers("https://host/b.txt"),
            Bytes::new(),
            "https://host/a.txt",
        )
        .unwrap();
        assert_eq!(
            op,
            Operation::Move {
                from: "a.txt".into(),
                to: "b.txt".into()
            }
        );
        assert_eq!(op.method(), DavMethod::Move);
    }

    #[test]
    fn test_move_under_base_path() {
        assert_eq!(
            destination_key(
                "https://host/api/flatdav/b.txt",
                "https://host/api/flatdav/a.txt"
            ),
            Ok("b.txt".to_string())
        );
    }

    #[test]
    fn test_move_missing_destination() {
        let method = Method::from_bytes(b"MOVE").unwrap();
        let err = parse_operation(
            &method,
            "a.txt",
            &HeaderMap::new(),
            Bytes::new(),
            "https://host/a.txt",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidDestination(DestinationError::Missing)
        ));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_move_into_subdirectory_rejected() {
        let err = destination_key("https://host/sub/b.txt", "https://host/a.txt").unwrap_err();
        assert_eq!(
            err,
            DestinationError::NotSibling {
                expected: "https://host/sub/b.txt".into(),
                actual: "https://host/b.txt".into(),
            }
        );
    }

    #[test]
    fn test_move_other_host_or_scheme_rejected() {
        assert!(destination_key("https://other/b.txt", "https://host/a.txt").is_err());
        assert!(destination_key("http://host/b.txt", "https://host/a.txt").is_err());
        assert!(destination_key("/b.txt", "https://host/a.txt").is_err());
        assert!(destination_key("b.txt", "https://host/a.txt").is_err());
    }

    #[test]
    fn test_move_empty_key_rejected() {
        assert_eq!(
            destination_key("https://host/", "https://host/a.txt"),
            Err(DestinationError::EmptyKey)
        );
        assert_eq!(
            destination_key("", "https://host/a.txt"),
            Err(DestinationError::EmptyKey)
        );
    }

    #[test]
    fn test_move_reserved_characters_rejected() {
        assert_eq!(
            destination_key("https://host/b.txt?x=1", "https://host/a.txt"),
            Err(DestinationError::ReservedCharacter('?'))
        );
        assert_eq!(
            destination_key("https://host/b.txt#frag", "https://host/a.txt"),
            Err(DestinationError::ReservedCharacter('#'))
        );
        assert_eq!(
            destination_key("https://host/b%20c.txt", "https://host/a.txt"),
            Err(DestinationError::ReservedCharacter('%'))
        );
    }

    #[test]
    fn test_request_query_is_ignored() {
        // The request URL's last segment (query included) is replaced.
        assert_eq!(
            destination_key("https://host/b.txt", "https://host/a.txt?v=2"),
            Ok("b.txt".to_string())
        );
    }
}
