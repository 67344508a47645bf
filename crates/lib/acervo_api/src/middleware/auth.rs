//! Authentication middleware — credential extraction, token verification,
//! and the admin gate.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum::http::header::AUTHORIZATION;
use axum_extra::extract::cookie::CookieJar;

use acervo_core::auth::token::{TokenClaims, verify_token};
use acervo_core::models::user::UserRole;

use crate::AppState;
use crate::error::AppError;
use crate::services::cookies::AUTH_COOKIE;

/// Key used to store `TokenClaims` in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub TokenClaims);

/// The httpOnly auth cookie set at login.
fn token_from_cookie(request: &Request) -> Option<String> {
    CookieJar::from_headers(request.headers())
        .get(AUTH_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

/// `Authorization: Bearer <token>`.
fn token_from_bearer(request: &Request) -> Option<String> {
    request
        .headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.to_string())
}

/// Credential extraction strategies, tried in order; first hit wins.
const EXTRACTORS: &[fn(&Request) -> Option<String>] = &[token_from_cookie, token_from_bearer];

fn extract_token(request: &Request) -> Option<String> {
    EXTRACTORS.iter().find_map(|extract| extract(request))
}

/// Axum middleware: extracts the credential from the cookie or the
/// `Authorization` header, verifies it, and injects `AuthenticatedUser`
/// into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(&request)
        .ok_or_else(|| AppError::Unauthorized("Token não fornecido".into()))?;

    let claims = verify_token(&token, state.config.jwt_secret.as_bytes())
        .ok_or_else(|| AppError::Unauthorized("Token inválido ou expirado".into()))?;

    request.extensions_mut().insert(AuthenticatedUser(claims));

    Ok(next.run(request).await)
}

/// Axum middleware: rejects non-admin identities. Composes after
/// `require_auth`, which must already have attached the identity.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or_else(|| AppError::Unauthorized("Usuário não autenticado".into()))?;

    if user.0.role != UserRole::Admin {
        return Err(AppError::Forbidden(
            "Acesso negado. Apenas administradores.".into(),
        ));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with(headers: &[(&str, &str)]) -> Request {
        let mut builder = axum::http::Request::builder().uri("/api/documentos");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn cookie_is_tried_before_bearer_header() {
        let request = request_with(&[
            ("cookie", "token=from-cookie"),
            ("authorization", "Bearer from-header"),
        ]);
        assert_eq!(extract_token(&request).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn bearer_header_is_the_fallback() {
        let request = request_with(&[("authorization", "Bearer from-header")]);
        assert_eq!(extract_token(&request).as_deref(), Some("from-header"));
    }

    #[test]
    fn non_bearer_scheme_is_ignored() {
        let request = request_with(&[("authorization", "Basic dXNlcjpwYXNz")]);
        assert_eq!(extract_token(&request), None);
    }

    #[test]
    fn no_credential_yields_none() {
        let request = request_with(&[]);
        assert_eq!(extract_token(&request), None);
    }
}
