//! # acervo_core
//!
//! Core domain logic for Acervo: credential primitives, the file storage
//! engine, and the user/document persistence queries shared by the API
//! crate and the CLI.

pub mod auth;
pub mod documents;
pub mod migrate;
pub mod models;
pub mod storage;
pub mod uuid;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
