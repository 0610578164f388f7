//! Basic auth middleware
//!
//! Runs ahead of routing and extraction so a caller without the credential
//! gets 401 before any path decoding or body buffering happens.

use crate::dav::{AppState, GatewayError, into_response};
use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use flatdav_core::DavResponse;
use std::sync::Arc;
use tracing::info;

/// Authentication middleware layer
pub async fn auth_layer(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, GatewayError> {
    if !state.handler.authorize(request.headers()) {
        info!(
            method = %request.method(),
            path = %request.uri().path(),
            "rejected: bad credentials"
        );
        return into_response(DavResponse::unauthorized());
    }
    Ok(next.run(request).await)
}
