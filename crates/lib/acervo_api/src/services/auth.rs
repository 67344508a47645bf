//! Authentication service — login and staff registration.

use tracing::info;

use acervo_core::auth::password::{hash_password, verify_password};
use acervo_core::auth::queries;
use acervo_core::auth::token::generate_token;
use acervo_core::auth::AuthError;
use acervo_core::models::user::{NewUser, UserRole};

use crate::AppState;
use crate::error::{AppError, AppResult, is_unique_violation};
use crate::models::{LoginResponse, RegisterRequest, UserView};

/// Unknown email and wrong password are deliberately indistinguishable.
fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Credenciais inválidas".into())
}

/// Authenticate with email + password, returning a token and a sanitized
/// user projection.
pub async fn login(state: &AppState, email: &str, password: &str) -> AppResult<LoginResponse> {
    let email = email.trim().to_lowercase();
    let password = password.trim();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::Validation("Email e senha são obrigatórios".into()));
    }

    let user = queries::find_user_by_email(&state.pool, &email)
        .await?
        .ok_or_else(invalid_credentials)?;

    if !user.active {
        return Err(AppError::Unauthorized("Usuário inativo".into()));
    }

    if !verify_password(password, &user.password_hash)? {
        return Err(invalid_credentials());
    }

    let token = generate_token(
        &user.id.to_string(),
        &user.email,
        user.role,
        state.config.jwt_secret.as_bytes(),
        state.config.token_ttl_secs,
    )?;

    info!(email = %user.email, "login");

    Ok(LoginResponse {
        token,
        user: UserView::from_row(&user),
    })
}

/// Register a new staff account.
///
/// The `email_exists` check is only the friendly fast path: two
/// concurrent registrations can both pass it, and the second insert then
/// trips the unique constraint, which is reported as the same duplicate
/// error.
pub async fn register(state: &AppState, req: &RegisterRequest) -> AppResult<UserView> {
    let name = req.name.trim();
    let email = req.email.trim().to_lowercase();
    let password = req.password.trim();
    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Nome, email e senha são obrigatórios".into(),
        ));
    }

    if queries::email_exists(&state.pool, &email).await? {
        return Err(AppError::Duplicate("Email já cadastrado".into()));
    }

    let user = NewUser {
        email,
        password_hash: hash_password(password)?,
        name: name.to_string(),
        role: req.role.unwrap_or(UserRole::Editor),
    };

    let row = match queries::create_user(&state.pool, &user).await {
        Ok(row) => row,
        Err(AuthError::Db(e)) if is_unique_violation(&e) => {
            return Err(AppError::Duplicate("Email já cadastrado".into()));
        }
        Err(e) => return Err(e.into()),
    };

    info!(email = %row.email, role = ?row.role, "user registered");

    Ok(UserView::from_row(&row))
}
