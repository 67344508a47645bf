//! Use-case services orchestrating repository, storage, and credential
//! primitives.

pub mod auth;
pub mod cookies;
pub mod documents;
pub mod users;
