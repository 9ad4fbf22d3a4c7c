use crate::{
    auth::{AuthError, TokenError},
    services::store_service::StoreError,
};
use axum::{
    Json,
    extract::rejection::{BytesRejection, PathRejection, QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// A lightweight wrapper for general errors that keeps the message local.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    /// Create a new AppError with a specific status and message.
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
        }
    }

    /// Shortcut for a 500 Internal Server Error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    /// Shortcut for 404 Not Found
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }

    /// Shortcut for 400 Bad Request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    /// Shortcut for 401 Unauthorized
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, msg)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message,
            "status": self.status.as_u16()
        }));

        let mut response = (self.status, body).into_response();
        if self.status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=\"bucketlist\""),
            );
        }
        response
    }
}

impl From<QueryRejection> for AppError {
    fn from(err: QueryRejection) -> Self {
        AppError::bad_request(err.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(err: PathRejection) -> Self {
        AppError::new(err.status(), err.body_text())
    }
}

impl From<BytesRejection> for AppError {
    fn from(err: BytesRejection) -> Self {
        AppError::new(err.status(), err.body_text())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EmptyField(_) | StoreError::InvalidUsername(_) => {
                AppError::bad_request(err.to_string())
            }
            // Kept at 400 to match the established client contract for user lookups.
            StoreError::UserNotFound(_) => AppError::bad_request(err.to_string()),
            StoreError::UsernameTaken(_) => AppError::new(StatusCode::CONFLICT, err.to_string()),
            StoreError::BucketListNotFound(_) | StoreError::ItemNotFound { .. } => {
                AppError::not_found(err.to_string())
            }
            StoreError::Sqlx(inner) => {
                tracing::error!("database error: {}", inner);
                AppError::internal("internal server error")
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken(TokenError::Signing) => {
                tracing::error!("auth failure: {}", err);
                AppError::internal("internal server error")
            }
            AuthError::MissingCredentials
            | AuthError::MalformedHeader
            | AuthError::InvalidCredentials
            | AuthError::InvalidToken(_) => AppError::unauthorized(err.to_string()),
            AuthError::Store(inner) => inner.into(),
            AuthError::Hash(_) | AuthError::Task(_) => {
                tracing::error!("auth failure: {}", err);
                AppError::internal("internal server error")
            }
        }
    }
}
