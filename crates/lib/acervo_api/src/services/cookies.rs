//! Cookie service — the httpOnly auth cookie set at login.

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

/// Cookie name for the access token.
pub const AUTH_COOKIE: &str = "token";

/// Build the httpOnly cookie carrying the access token. The cookie may
/// outlive the token itself; an expired token inside it still fails
/// verification.
pub fn auth_cookie(token: &str) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE.to_string(), token.to_string()))
        .http_only(true)
        .secure(false) // TODO: set true once the site terminates TLS itself
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .max_age(Duration::hours(1))
        .build()
}

/// Build an expired cookie to clear auth state at logout.
pub fn clear_auth_cookie() -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE.to_string(), String::new()))
        .http_only(true)
        .secure(false)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .max_age(Duration::ZERO)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_cookie_is_http_only_and_scoped_to_root() {
        let cookie = auth_cookie("abc");
        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let cookie = clear_auth_cookie();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }
}
