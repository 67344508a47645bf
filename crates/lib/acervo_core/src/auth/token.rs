//! Bearer token generation and verification.
//!
//! Tokens are deliberately short-lived (3 minutes by default); there is
//! no refresh flow, expiry forces a fresh login.

use std::path::PathBuf;

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::AuthError;
use crate::models::user::UserRole;

/// Default token lifetime: 3 minutes.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3 * 60;

/// Claims embedded in access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject — user ID (standard JWT `sub` claim).
    pub sub: String,
    /// User email.
    pub email: String,
    /// User role.
    pub role: UserRole,
    /// Expiry (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
}

/// Generate a signed access token (HS256).
pub fn generate_token(
    user_id: &str,
    email: &str,
    role: UserRole,
    secret: &[u8],
    ttl_secs: i64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = TokenClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role,
        exp: (now + Duration::seconds(ttl_secs)).timestamp(),
        iat: now.timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::Token(format!("jwt encode: {e}")))
}

/// Verify an access token, returning the claims on success.
///
/// `None` on any signature or expiry failure. No clock leeway: with a
/// 3-minute lifetime, the default 60-second grace would be a third of it.
pub fn verify_token(token: &str, secret: &[u8]) -> Option<TokenClaims> {
    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::default();
    validation.validate_exp = true;
    validation.leeway = 0;
    decode::<TokenClaims>(token, &key, &validation)
        .ok()
        .map(|data| data.claims)
}

/// Resolve the token-signing secret: env var `JWT_SECRET` → persisted file.
pub fn resolve_jwt_secret() -> String {
    if let Ok(secret) = std::env::var("JWT_SECRET")
        && !secret.is_empty()
    {
        return secret;
    }
    // Generate and persist
    let secret_path = jwt_secret_path();
    if let Ok(existing) = std::fs::read_to_string(&secret_path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    if let Some(parent) = secret_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = std::fs::write(&secret_path, &secret);
    info!(path = %secret_path.display(), "generated new JWT secret");
    secret
}

/// Path to the persisted signing secret.
fn jwt_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("acervo")
        .join("jwt-secret")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn round_trip_preserves_claims() {
        let token = generate_token("u-1", "staff@acervo.org", UserRole::Editor, SECRET, 180)
            .expect("generate");
        let claims = verify_token(&token, SECRET).expect("verify");
        assert_eq!(claims.sub, "u-1");
        assert_eq!(claims.email, "staff@acervo.org");
        assert_eq!(claims.role, UserRole::Editor);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = generate_token("u-1", "staff@acervo.org", UserRole::Admin, SECRET, -120)
            .expect("generate");
        assert!(verify_token(&token, SECRET).is_none());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = generate_token("u-1", "staff@acervo.org", UserRole::Admin, SECRET, 180)
            .expect("generate");
        let mut tampered = token.clone();
        tampered.pop();
        tampered.push(if token.ends_with('A') { 'B' } else { 'A' });
        assert!(verify_token(&tampered, SECRET).is_none());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_token("u-1", "staff@acervo.org", UserRole::Admin, SECRET, 180)
            .expect("generate");
        assert!(verify_token(&token, b"other-secret").is_none());
    }
}
