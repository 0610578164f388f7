//! HTTP adapter for the DAV handler
//!
//! Turns an axum request into a [`DavRequest`] and the handler's
//! [`DavResponse`] back into an axum response.

use axum::{
    body::{Body, Bytes},
    extract::{OriginalUri, Path, State},
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use flatdav_core::{DavHandler, DavRequest, DavResponse};
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

/// Headers describing the backend connection rather than the object.
/// Content-Length is recomputed from the body we send.
fn is_hop_by_hop(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection"
            | "content-length"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-connection"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
    )
}

/// Application state shared across requests
pub struct AppState {
    pub handler: DavHandler,
    /// Scheme assumed when the client did not come through a proxy
    pub default_scheme: String,
}

impl AppState {
    /// Create a new app state
    pub fn new(handler: DavHandler, default_scheme: impl Into<String>) -> Self {
        Self {
            handler,
            default_scheme: default_scheme.into(),
        }
    }
}

/// Failures the gateway does not describe to the client
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Handler(#[from] flatdav_core::Error),

    #[error("backend reported invalid status code {0}")]
    InvalidStatus(u16),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        error!("request failed: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error\n").into_response()
    }
}

/// Handle any method on `/{key}`
pub async fn dav(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Path(key): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, GatewayError> {
    let url = request_url(&state.default_scheme, &headers, &uri);
    let request = DavRequest {
        method,
        key,
        headers,
        body,
        url,
    };
    let response = state.handler.handle(request).await?;
    into_response(response)
}

/// Rebuild the URL the client used
///
/// Proxies report the original scheme and host in `X-Forwarded-Proto` and
/// `X-Forwarded-Host`; the first listed value wins.
pub fn request_url(default_scheme: &str, headers: &HeaderMap, uri: &Uri) -> String {
    let forwarded = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    let scheme = forwarded("x-forwarded-proto")
        .or_else(|| uri.scheme_str())
        .unwrap_or(default_scheme);
    let host = forwarded("x-forwarded-host")
        .or_else(|| headers.get(header::HOST).and_then(|v| v.to_str().ok()))
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .unwrap_or_default();
    let path = uri.path_and_query().map_or_else(|| uri.path(), |pq| pq.as_str());

    format!("{scheme}://{host}{path}")
}

/// Convert a handler response into an axum response
pub fn into_response(dav: DavResponse) -> Result<Response, GatewayError> {
    let status =
        StatusCode::from_u16(dav.status).map_err(|_| GatewayError::InvalidStatus(dav.status))?;
    let generated = dav.headers.is_none() && dav.body.is_some();

    let mut response = Response::new(dav.body.map_or_else(Body::empty, Body::from));
    *response.status_mut() = status;

    let out = response.headers_mut();
    if let Some(headers) = dav.headers {
        for (name, value) in &headers {
            if !is_hop_by_hop(name) {
                out.append(name.clone(), value.clone());
            }
        }
    }
    if generated {
        out.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
    }
    Ok(response)
}
