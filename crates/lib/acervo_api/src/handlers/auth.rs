//! Authentication request handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;

use crate::AppState;
use crate::error::AppResult;
use crate::models::{LoginRequest, LoginResponse, LogoutResponse, RegisterRequest, UserView};
use crate::services::{auth, cookies};

/// `POST /api/auth/login` — authenticate with email + password. The
/// token is returned in the body and mirrored into an httpOnly cookie.
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let resp = auth::login(&state, &body.email, &body.password).await?;
    let jar = jar.add(cookies::auth_cookie(&resp.token));
    Ok((jar, Json(resp)))
}

/// `POST /api/auth/registrar` — create a staff account. Admin only.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserView>)> {
    let user = auth::register(&state, &body).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `POST /api/auth/logout` — clear the auth cookie and send the client
/// home.
pub async fn logout_handler(jar: CookieJar) -> (CookieJar, Json<LogoutResponse>) {
    (
        jar.add(cookies::clear_auth_cookie()),
        Json(LogoutResponse {
            redirect: "/".into(),
        }),
    )
}
