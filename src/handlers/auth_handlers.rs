//! Registration and token issuance.

use crate::{
    auth::AuthUser,
    errors::AppError,
    handlers::JsonBody,
    models::user::User,
    state::AppState,
};
use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Body for `POST /auth/register`.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterReq {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    /// Seconds until the token expires.
    pub duration: i64,
}

/// POST `/auth/register`: create an account.
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterReq>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = state
        .auth
        .register(
            payload.username.as_deref().unwrap_or_default(),
            payload.password.as_deref().unwrap_or_default(),
        )
        .await?;

    info!(user_id = user.id, "registered {}", user.username);
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST `/auth/login`: exchange credentials (or a still-valid token) for a fresh token.
pub async fn login(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<TokenResponse>, AppError> {
    let token = state.auth.issue_token(&user)?;
    info!(user_id = user.id, "issued token");
    Ok(Json(TokenResponse {
        token,
        duration: state.auth.token_ttl_secs(),
    }))
}
