//! A completable entry inside a bucketlist.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single item belonging to exactly one bucketlist.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct BucketItem {
    pub id: i64,
    pub name: String,
    pub done: bool,
    pub bucketlist_id: i64,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}
