//! Staff-account database queries.
//!
//! Email uniqueness is ultimately enforced by the `users.email` unique
//! constraint; `email_exists` only serves the friendly fast-path check.

use sqlx::PgPool;
use uuid::Uuid;

use super::AuthError;
use crate::models::user::{NewUser, UpdateUser, UserRow};

/// Fetch a user by (pre-normalized) email, including the password hash
/// and active flag needed by the login flow.
pub async fn find_user_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<UserRow>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, password_hash, name, role, active, created_at, updated_at \
         FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Create a new user, returning the stored row.
pub async fn create_user(pool: &PgPool, user: &NewUser) -> Result<UserRow, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
        "INSERT INTO users (email, password_hash, name, role) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, email, password_hash, name, role, active, created_at, updated_at",
    )
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.name)
    .bind(user.role)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Check whether an email is already registered.
pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, AuthError> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

/// Fetch a user by ID.
pub async fn get_user_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<UserRow>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, password_hash, name, role, active, created_at, updated_at \
         FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// List all users, alphabetically.
pub async fn list_users(pool: &PgPool) -> Result<Vec<UserRow>, AuthError> {
    let rows = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, password_hash, name, role, active, created_at, updated_at \
         FROM users ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Apply a partial update (name, role, active flag), bumping `updated_at`.
/// Returns the updated row, or `None` if the user does not exist.
pub async fn update_user(
    pool: &PgPool,
    user_id: Uuid,
    update: &UpdateUser,
) -> Result<Option<UserRow>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
        "UPDATE users SET \
             name = COALESCE($2, name), \
             role = COALESCE($3, role), \
             active = COALESCE($4, active), \
             updated_at = now() \
         WHERE id = $1 \
         RETURNING id, email, password_hash, name, role, active, created_at, updated_at",
    )
    .bind(user_id)
    .bind(update.name.as_deref())
    .bind(update.role)
    .bind(update.active)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
