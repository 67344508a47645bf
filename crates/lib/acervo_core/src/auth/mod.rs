//! Credential primitives and staff-account queries.
//!
//! Password hashing, token mint/verify, and the `users` table queries
//! shared by the API crate and the CLI.

pub mod password;
pub mod queries;
pub mod token;

use thiserror::Error;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token error: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
