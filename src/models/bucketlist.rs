//! A named, user-owned collection of items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::bucket_item::BucketItem;

/// A bucketlist row.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct BucketList {
    /// Primary key.
    pub id: i64,

    /// Display name, stored trimmed and never empty.
    pub name: String,

    /// The user who created the list. Never changes.
    pub owner_id: i64,

    pub created_at: DateTime<Utc>,

    /// Refreshed on every rename.
    pub modified_at: DateTime<Utc>,
}

/// A bucketlist together with its items, as returned by the API.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BucketListWithItems {
    #[serde(flatten)]
    pub bucketlist: BucketList,

    pub items: Vec<BucketItem>,
}
