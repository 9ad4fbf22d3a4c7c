use crate::{auth::AuthUser, errors::AppError, models::user::User, state::AppState};
use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};

/// GET `/users`
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.store.list_users().await?))
}

/// GET `/users/{username}`: unknown names answer 400.
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    username: Result<Path<String>, PathRejection>,
) -> Result<Json<User>, AppError> {
    let Path(username) = username?;
    Ok(Json(state.store.get_user(&username).await?))
}
