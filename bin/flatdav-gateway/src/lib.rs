//! FlatDav Gateway - HTTP host for the FlatDav handler
//!
//! Routes every method on `/{key}` (optionally under a base path) to the
//! core handler.

pub mod args;
pub mod auth_middleware;
pub mod dav;

use auth_middleware::auth_layer;
use axum::{Router, extract::DefaultBodyLimit, middleware, routing::any};
use flatdav_core::config::ServerConfig;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use dav::{AppState, GatewayError};

/// Build the gateway router
pub fn router(state: Arc<AppState>, server: &ServerConfig) -> Router {
    // Auth wraps the body limit so unauthenticated uploads are never buffered
    let routes = Router::new()
        .route("/{key}", any(dav::dav))
        .layer(DefaultBodyLimit::max(server.max_body_bytes))
        .layer(middleware::from_fn_with_state(state.clone(), auth_layer))
        .with_state(state);

    let app = if server.base_path.is_empty() {
        routes
    } else {
        Router::new().nest(&server.base_path, routes)
    };

    app.layer(TraceLayer::new_for_http())
}
