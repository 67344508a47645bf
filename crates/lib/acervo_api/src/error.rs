//! Application error types.
//!
//! Services raise these with the user-facing (Portuguese) messages the
//! frontend displays verbatim; internal detail never leaves the process.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Duplicate record: {0}")]
    Duplicate(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(m) | AppError::Duplicate(m) => {
                (StatusCode::BAD_REQUEST, m.as_str())
            }
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, m.as_str()),
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.as_str()),
            AppError::Forbidden(m) => (StatusCode::FORBIDDEN, m.as_str()),
            AppError::Internal(detail) => {
                tracing::error!(%detail, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Erro interno do servidor")
            }
        };
        let body = Json(ErrorResponse {
            error: message.to_string(),
        });
        (status, body).into_response()
    }
}

/// Whether a database error is a unique-constraint violation.
pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == "23505")
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => AppError::NotFound("Registro não encontrado".into()),
            _ if is_unique_violation(&e) => AppError::Duplicate("Registro duplicado".into()),
            _ => AppError::Internal(e.to_string()),
        }
    }
}

impl From<acervo_core::auth::AuthError> for AppError {
    fn from(e: acervo_core::auth::AuthError) -> Self {
        match e {
            acervo_core::auth::AuthError::Token(msg) => AppError::Unauthorized(msg),
            acervo_core::auth::AuthError::Db(e) => AppError::from(e),
            acervo_core::auth::AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<acervo_core::storage::StorageError> for AppError {
    fn from(e: acervo_core::storage::StorageError) -> Self {
        match e {
            acervo_core::storage::StorageError::UnsupportedType(_) => AppError::Validation(
                "Tipo de arquivo não permitido. Use PDF, DOC, DOCX ou imagens.".into(),
            ),
            acervo_core::storage::StorageError::FileTooLarge { .. } => {
                AppError::Validation("Arquivo muito grande. Tamanho máximo: 10MB".into())
            }
            acervo_core::storage::StorageError::Io(e) => AppError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn error_body_uses_the_erro_field() {
        let response = AppError::NotFound("Documento não encontrado".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_of(response).await;
        assert_eq!(json["erro"], "Documento não encontrado");
    }

    #[tokio::test]
    async fn internal_errors_hide_detail() {
        let response = AppError::Internal("connection refused".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_of(response).await;
        assert_eq!(json["erro"], "Erro interno do servidor");
    }

    #[tokio::test]
    async fn storage_rejections_map_to_validation() {
        let err: AppError =
            acervo_core::storage::StorageError::FileTooLarge { size: 11, max: 10 }.into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_of(response).await;
        assert_eq!(json["erro"], "Arquivo muito grande. Tamanho máximo: 10MB");
    }
}
