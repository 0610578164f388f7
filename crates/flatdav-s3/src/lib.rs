//! FlatDav S3 - S3-compatible object store backend
//!
//! Implements [`flatdav_core::ObjectStore`] over one bucket using the
//! `rust-s3` client. Backend error documents are decoded so the gateway can
//! report the backend's own error code and message.

pub mod error;
pub mod store;

pub use error::S3SetupError;
pub use store::S3Store;
