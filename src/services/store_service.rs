//! src/services/store_service.rs
//!
//! StoreService: typed repository over SQLite for users, bucketlists and
//! bucket items. Every bucketlist/item query is scoped by `owner_id`, so a
//! row owned by someone else is reported exactly like a missing row.

use crate::models::{
    bucket_item::BucketItem,
    bucketlist::{BucketList, BucketListWithItems},
    user::User,
};
use chrono::Utc;
use sqlx::{Executor, QueryBuilder, SqlitePool, sqlite::Sqlite};
use std::{collections::HashMap, sync::Arc};
use thiserror::Error;
use tracing::debug;

/// Page size used when the client does not send `limit`.
pub const DEFAULT_LIMIT: u32 = 20;
/// Upper bound for `limit`; larger requests are clamped to it.
pub const MAX_LIMIT: u32 = 100;

const BUCKETLIST_COLUMNS: &str = "id, name, owner_id, created_at, modified_at";
const ITEM_COLUMNS: &str = "id, name, done, bucketlist_id, created_at, modified_at";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    #[error("user `{0}` not found")]
    UserNotFound(String),
    #[error("username must not contain ':'")]
    InvalidUsername(String),
    #[error("username `{0}` is already taken")]
    UsernameTaken(String),
    #[error("bucketlist {0} not found")]
    BucketListNotFound(i64),
    #[error("item {item_id} not found in bucketlist {bucketlist_id}")]
    ItemNotFound { bucketlist_id: i64, item_id: i64 },
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Filtering and paging for `list_bucketlists`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListParams {
    pub limit: u32,
    pub page: u32,
    pub q: Option<String>,
}

impl ListParams {
    /// Normalize raw query values: `limit` falls into `1..=MAX_LIMIT`,
    /// `page` is at least 1, and a blank `q` means no filter.
    pub fn new(limit: Option<u32>, page: Option<u32>, q: Option<String>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            page: page.unwrap_or(1).max(1),
            q: q.map(|q| q.trim().to_string()).filter(|q| !q.is_empty()),
        }
    }

    fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }
}

/// Partial update applied to a bucket item. `None` leaves a field as is.
#[derive(Clone, Debug, Default)]
pub struct ItemChanges {
    pub name: Option<String>,
    pub done: Option<bool>,
}

/// StoreService is the only component that talks to the database.
///
/// It is cheap to clone and is handed to every handler through the router
/// state instead of living in a global.
#[derive(Clone)]
pub struct StoreService {
    /// Shared SQLite connection pool.
    pub db: Arc<SqlitePool>,
}

impl StoreService {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    /// Cheap round trip used by the readiness probe.
    pub async fn ping(&self) -> StoreResult<i64> {
        let value = sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&*self.db)
            .await?;
        Ok(value)
    }

    // --- users ---

    /// Insert a new user. The caller hashes the password beforehand.
    pub async fn create_user(&self, username: &str, password_hash: &str) -> StoreResult<User> {
        let username = required("username", username)?;
        // Basic credentials split on the first colon.
        if username.contains(':') {
            return Err(StoreError::InvalidUsername(username));
        }

        let result = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password_hash, created_at)
             VALUES (?, ?, ?)
             RETURNING id, username, password_hash, created_at",
        )
        .bind(&username)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(&*self.db)
        .await;

        match result {
            Ok(user) => {
                debug!(user_id = user.id, "registered user {}", user.username);
                Ok(user)
            }
            Err(err) if is_unique_violation(&err) => Err(StoreError::UsernameTaken(username)),
            Err(err) => Err(StoreError::Sqlx(err)),
        }
    }

    /// Look a user up by name without treating absence as an error.
    pub async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&*self.db)
        .await?;
        Ok(user)
    }

    pub async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&*self.db)
        .await?;
        Ok(user)
    }

    pub async fn get_user(&self, username: &str) -> StoreResult<User> {
        self.find_user_by_username(username)
            .await?
            .ok_or_else(|| StoreError::UserNotFound(username.to_string()))
    }

    pub async fn list_users(&self) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users ORDER BY id ASC",
        )
        .fetch_all(&*self.db)
        .await?;
        Ok(users)
    }

    // --- bucketlists ---

    /// List the bucketlists owned by `owner_id`, each with its items.
    ///
    /// `q` matches anywhere in the name, ignoring case. Both sides are folded
    /// with Rust's Unicode lowercasing; SQLite's `lower()` only folds ASCII.
    pub async fn list_bucketlists(
        &self,
        owner_id: i64,
        params: &ListParams,
    ) -> StoreResult<Vec<BucketListWithItems>> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {BUCKETLIST_COLUMNS} FROM bucketlists WHERE owner_id = "
        ));
        builder.push_bind(owner_id);

        if let Some(q) = &params.q {
            builder.push(" AND instr(name_folded, ");
            builder.push_bind(fold(q));
            builder.push(") > 0");
        }

        builder.push(" ORDER BY id ASC LIMIT ");
        builder.push_bind(i64::from(params.limit));
        builder.push(" OFFSET ");
        builder.push_bind(params.offset());

        let lists: Vec<BucketList> = builder.build_query_as().fetch_all(&*self.db).await?;
        self.attach_items(lists).await
    }

    pub async fn create_bucketlist(
        &self,
        owner_id: i64,
        name: &str,
    ) -> StoreResult<BucketListWithItems> {
        let name = required("name", name)?;
        let now = Utc::now();

        let bucketlist = sqlx::query_as::<_, BucketList>(&format!(
            "INSERT INTO bucketlists (name, name_folded, owner_id, created_at, modified_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING {BUCKETLIST_COLUMNS}"
        ))
        .bind(&name)
        .bind(fold(&name))
        .bind(owner_id)
        .bind(now)
        .bind(now)
        .fetch_one(&*self.db)
        .await?;

        debug!(bucketlist_id = bucketlist.id, owner_id, "created bucketlist");
        Ok(BucketListWithItems {
            bucketlist,
            items: Vec::new(),
        })
    }

    pub async fn get_bucketlist(&self, owner_id: i64, id: i64) -> StoreResult<BucketListWithItems> {
        let bucketlist = fetch_owned_bucketlist(&*self.db, owner_id, id).await?;
        let items = fetch_items(&*self.db, id).await?;
        Ok(BucketListWithItems { bucketlist, items })
    }

    pub async fn rename_bucketlist(
        &self,
        owner_id: i64,
        id: i64,
        name: &str,
    ) -> StoreResult<BucketListWithItems> {
        let name = required("name", name)?;

        let bucketlist = sqlx::query_as::<_, BucketList>(&format!(
            "UPDATE bucketlists SET name = ?, name_folded = ?, modified_at = ?
             WHERE id = ? AND owner_id = ?
             RETURNING {BUCKETLIST_COLUMNS}"
        ))
        .bind(&name)
        .bind(fold(&name))
        .bind(Utc::now())
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&*self.db)
        .await?
        .ok_or(StoreError::BucketListNotFound(id))?;

        let items = fetch_items(&*self.db, id).await?;
        Ok(BucketListWithItems { bucketlist, items })
    }

    /// Delete a bucketlist and every item in it.
    pub async fn delete_bucketlist(&self, owner_id: i64, id: i64) -> StoreResult<()> {
        let mut tx = self.db.begin().await?;
        fetch_owned_bucketlist(&mut *tx, owner_id, id).await?;

        let removed = sqlx::query("DELETE FROM bucketitems WHERE bucketlist_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        sqlx::query("DELETE FROM bucketlists WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!(bucketlist_id = id, items = removed, "deleted bucketlist");
        Ok(())
    }

    // --- items ---

    pub async fn create_item(
        &self,
        owner_id: i64,
        bucketlist_id: i64,
        name: &str,
        done: bool,
    ) -> StoreResult<BucketItem> {
        let name = required("name", name)?;
        let now = Utc::now();

        let mut tx = self.db.begin().await?;
        fetch_owned_bucketlist(&mut *tx, owner_id, bucketlist_id).await?;

        let item = sqlx::query_as::<_, BucketItem>(&format!(
            "INSERT INTO bucketitems (name, done, bucketlist_id, created_at, modified_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(&name)
        .bind(done)
        .bind(bucketlist_id)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(item)
    }

    pub async fn get_item(
        &self,
        owner_id: i64,
        bucketlist_id: i64,
        item_id: i64,
    ) -> StoreResult<BucketItem> {
        fetch_owned_bucketlist(&*self.db, owner_id, bucketlist_id).await?;

        sqlx::query_as::<_, BucketItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM bucketitems WHERE id = ? AND bucketlist_id = ?"
        ))
        .bind(item_id)
        .bind(bucketlist_id)
        .fetch_optional(&*self.db)
        .await?
        .ok_or(StoreError::ItemNotFound {
            bucketlist_id,
            item_id,
        })
    }

    /// Apply `changes` to an item. `modified_at` moves even when nothing else does.
    pub async fn update_item(
        &self,
        owner_id: i64,
        bucketlist_id: i64,
        item_id: i64,
        changes: ItemChanges,
    ) -> StoreResult<BucketItem> {
        let name = changes
            .name
            .as_deref()
            .map(|name| required("name", name))
            .transpose()?;

        let mut tx = self.db.begin().await?;
        fetch_owned_bucketlist(&mut *tx, owner_id, bucketlist_id).await?;

        let item = sqlx::query_as::<_, BucketItem>(&format!(
            "UPDATE bucketitems
             SET name = COALESCE(?, name), done = COALESCE(?, done), modified_at = ?
             WHERE id = ? AND bucketlist_id = ?
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(name)
        .bind(changes.done)
        .bind(Utc::now())
        .bind(item_id)
        .bind(bucketlist_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StoreError::ItemNotFound {
            bucketlist_id,
            item_id,
        })?;

        tx.commit().await?;
        Ok(item)
    }

    pub async fn delete_item(
        &self,
        owner_id: i64,
        bucketlist_id: i64,
        item_id: i64,
    ) -> StoreResult<()> {
        let mut tx = self.db.begin().await?;
        fetch_owned_bucketlist(&mut *tx, owner_id, bucketlist_id).await?;

        let result = sqlx::query("DELETE FROM bucketitems WHERE id = ? AND bucketlist_id = ?")
            .bind(item_id)
            .bind(bucketlist_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::ItemNotFound {
                bucketlist_id,
                item_id,
            });
        }

        tx.commit().await?;
        Ok(())
    }

    /// Load the items of every list in `lists` with a single query.
    async fn attach_items(&self, lists: Vec<BucketList>) -> StoreResult<Vec<BucketListWithItems>> {
        if lists.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {ITEM_COLUMNS} FROM bucketitems WHERE bucketlist_id IN ("
        ));
        let mut separated = builder.separated(", ");
        for list in &lists {
            separated.push_bind(list.id);
        }
        separated.push_unseparated(") ORDER BY id ASC");

        let rows: Vec<BucketItem> = builder.build_query_as().fetch_all(&*self.db).await?;
        let mut by_list: HashMap<i64, Vec<BucketItem>> = HashMap::new();
        for item in rows {
            by_list.entry(item.bucketlist_id).or_default().push(item);
        }

        Ok(lists
            .into_iter()
            .map(|bucketlist| BucketListWithItems {
                items: by_list.remove(&bucketlist.id).unwrap_or_default(),
                bucketlist,
            })
            .collect())
    }
}

/// Fetch a bucketlist only if `owner_id` owns it.
async fn fetch_owned_bucketlist<'e, E>(executor: E, owner_id: i64, id: i64) -> StoreResult<BucketList>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, BucketList>(&format!(
        "SELECT {BUCKETLIST_COLUMNS} FROM bucketlists WHERE id = ? AND owner_id = ?"
    ))
    .bind(id)
    .bind(owner_id)
    .fetch_optional(executor)
    .await?
    .ok_or(StoreError::BucketListNotFound(id))
}

async fn fetch_items<'e, E>(executor: E, bucketlist_id: i64) -> StoreResult<Vec<BucketItem>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let items = sqlx::query_as::<_, BucketItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM bucketitems WHERE bucketlist_id = ? ORDER BY id ASC"
    ))
    .bind(bucketlist_id)
    .fetch_all(executor)
    .await?;
    Ok(items)
}

/// Trim a required text field, rejecting blanks.
fn required(field: &'static str, value: &str) -> StoreResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

/// Case-fold a bucketlist name or search term.
fn fold(value: &str) -> String {
    value.to_lowercase()
}

/// Return true if SQLx error indicates a unique constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}
