//! Staff management request handlers. Admin only.

use axum::Json;
use axum::extract::{Path, State};

use crate::AppState;
use crate::error::AppResult;
use crate::handlers::parse_id;
use crate::models::{UpdateUserRequest, UserView};
use crate::services::users;

/// `GET /api/usuarios` — list staff accounts.
pub async fn list_users_handler(State(state): State<AppState>) -> AppResult<Json<Vec<UserView>>> {
    Ok(Json(users::list_users(&state).await?))
}

/// `PUT /api/usuarios/{id}` — partial update of name/role/active flag.
pub async fn update_user_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateUserRequest>,
) -> AppResult<Json<UserView>> {
    let view = users::update_user(&state, parse_id(&id)?, body).await?;
    Ok(Json(view))
}
