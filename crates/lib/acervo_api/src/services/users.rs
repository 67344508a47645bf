//! Staff management service — admin-only listing and updates.

use tracing::info;
use uuid::Uuid;

use acervo_core::auth::queries;
use acervo_core::models::user::UpdateUser;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{UpdateUserRequest, UserView};

/// List all staff accounts.
pub async fn list_users(state: &AppState) -> AppResult<Vec<UserView>> {
    let rows = queries::list_users(&state.pool).await?;
    Ok(rows.iter().map(UserView::from_row).collect())
}

/// Apply a partial update (name, role, active flag) to a staff account.
pub async fn update_user(
    state: &AppState,
    user_id: Uuid,
    req: UpdateUserRequest,
) -> AppResult<UserView> {
    let update = UpdateUser {
        name: req.name,
        role: req.role,
        active: req.active,
    };
    let row = queries::update_user(&state.pool, user_id, &update)
        .await?
        .ok_or_else(|| AppError::NotFound("Usuário não encontrado".into()))?;

    info!(user_id = %row.id, "user updated");

    Ok(UserView::from_row(&row))
}
