//! FlatDav Core - WebDAV-style requests over a flat object store
//!
//! This crate turns GET/PUT/DELETE/MOVE requests against a flat key
//! namespace into object store calls and maps the results back to HTTP.
//! It knows nothing about the HTTP server that hosts it.

pub mod auth;
pub mod config;
pub mod error;
pub mod executor;
pub mod handler;
pub mod memory;
pub mod op;
pub mod response;
pub mod store;

pub use auth::Credential;
pub use config::Config;
pub use error::{BackendError, DestinationError, Error, ParseError, Result, StoreError};
pub use handler::{DavHandler, DavRequest};
pub use memory::MemoryStore;
pub use op::{DavMethod, Operation};
pub use response::DavResponse;
pub use store::{ObjectStore, StoreOutput, StoreResult};
