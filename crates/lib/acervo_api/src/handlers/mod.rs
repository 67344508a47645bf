//! Request handlers.

pub mod auth;
pub mod documents;
pub mod health;
pub mod public;
pub mod users;

use uuid::Uuid;

use crate::error::AppError;

/// Parse a path ID, rejecting malformed values at the boundary.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation("Identificador inválido".into()))
}
