//! Axum extractor that resolves the requesting user.

use crate::{errors::AppError, models::user::User, state::AppState};
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::debug;

use super::{AuthError, parse_authorization};

/// The authenticated user behind the current request.
///
/// Handlers that take this argument reject the request with 401 before
/// running when the `Authorization` header is missing or does not check out.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingCredentials)?
            .to_str()
            .map_err(|_| AuthError::MalformedHeader)?;

        let credentials = parse_authorization(value)?;
        let user = state.auth.authenticate(credentials).await?;
        debug!(user_id = user.id, "authenticated {}", user.username);
        Ok(AuthUser(user))
    }
}
