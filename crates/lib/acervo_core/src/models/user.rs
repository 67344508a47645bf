//! Staff account domain models.

use serde::{Deserialize, Serialize};

/// Staff role. Admins may manage accounts; editors manage documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Editor,
}

/// Database row for `users`. Carries the password hash, so it must never
/// be serialized — external projections are built in the API layer.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: uuid::Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Fields for creating a user. The email is expected pre-normalized
/// (trimmed, lowercased) by the caller.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
}

/// Partial update of a user. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub role: Option<UserRole>,
    pub active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_wire_values_are_lowercase() {
        assert_eq!(
            serde_json::to_string(&UserRole::Admin).unwrap(),
            "\"admin\""
        );
        let role: UserRole = serde_json::from_str("\"editor\"").unwrap();
        assert_eq!(role, UserRole::Editor);
    }
}
