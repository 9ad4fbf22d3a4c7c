//! A registered account that owns bucketlists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user of the API.
///
/// The password hash is loaded with the row so credentials can be checked,
/// but it is never serialized into a response.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct User {
    /// Primary key.
    pub id: i64,

    /// Unique login name.
    pub username: String,

    /// Argon2id PHC string.
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// When the account was registered.
    pub created_at: DateTime<Utc>,
}
