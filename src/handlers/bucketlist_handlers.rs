//! HTTP handlers for bucketlists and their items.
//!
//! Every handler is scoped to the authenticated user. A bucketlist owned by
//! someone else answers 404, exactly like one that does not exist.

use crate::{
    auth::AuthUser,
    errors::AppError,
    handlers::JsonBody,
    models::{bucket_item::BucketItem, bucketlist::BucketListWithItems},
    services::store_service::{ItemChanges, ListParams},
    state::AppState,
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Query params accepted by `GET /bucketlists`.
#[derive(Debug, Default, Deserialize)]
pub struct ListBucketListsQuery {
    pub limit: Option<u32>,
    pub page: Option<u32>,
    pub q: Option<String>,
}

/// Body for creating or renaming a bucketlist.
#[derive(Debug, Default, Deserialize)]
pub struct BucketListReq {
    #[serde(default)]
    pub name: Option<String>,
}

/// Body for creating or updating an item.
#[derive(Debug, Default, Deserialize)]
pub struct BucketItemReq {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub done: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET `/bucketlists`: supports ?limit=&page=&q=
pub async fn list_bucketlists(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    query: Result<Query<ListBucketListsQuery>, QueryRejection>,
) -> Result<Json<Vec<BucketListWithItems>>, AppError> {
    let Query(query) = query?;
    let params = ListParams::new(query.limit, query.page, query.q);
    let lists = state.store.list_bucketlists(user.id, &params).await?;
    Ok(Json(lists))
}

/// POST `/bucketlists`
pub async fn create_bucketlist(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    JsonBody(payload): JsonBody<BucketListReq>,
) -> Result<Json<BucketListWithItems>, AppError> {
    let name = payload.name.unwrap_or_default();
    let created = state.store.create_bucketlist(user.id, &name).await?;
    info!(
        bucketlist_id = created.bucketlist.id,
        owner_id = user.id,
        "created bucketlist"
    );
    Ok(Json(created))
}

/// GET `/bucketlists/{id}`
pub async fn get_bucketlist(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<BucketListWithItems>, AppError> {
    let Path(id) = id?;
    Ok(Json(state.store.get_bucketlist(user.id, id).await?))
}

/// PUT `/bucketlists/{id}`: rename.
pub async fn update_bucketlist(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    id: Result<Path<i64>, PathRejection>,
    JsonBody(payload): JsonBody<BucketListReq>,
) -> Result<Json<BucketListWithItems>, AppError> {
    let Path(id) = id?;
    let name = payload.name.unwrap_or_default();
    let updated = state.store.rename_bucketlist(user.id, id, &name).await?;
    info!(bucketlist_id = id, "renamed bucketlist");
    Ok(Json(updated))
}

/// DELETE `/bucketlists/{id}`: removes the list and all of its items.
pub async fn delete_bucketlist(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(id) = id?;
    state.store.delete_bucketlist(user.id, id).await?;
    info!(bucketlist_id = id, "deleted bucketlist");
    Ok(Json(MessageResponse {
        message: format!("bucketlist {id} deleted"),
    }))
}

/// POST `/bucketlists/{id}/items`
pub async fn create_item(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    id: Result<Path<i64>, PathRejection>,
    JsonBody(payload): JsonBody<BucketItemReq>,
) -> Result<Json<BucketItem>, AppError> {
    let Path(bucketlist_id) = id?;
    let name = payload.name.unwrap_or_default();
    let item = state
        .store
        .create_item(user.id, bucketlist_id, &name, payload.done.unwrap_or(false))
        .await?;
    info!(bucketlist_id, item_id = item.id, "created item");
    Ok(Json(item))
}

/// GET `/bucketlists/{id}/items/{item_id}`
pub async fn get_item(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ids: Result<Path<(i64, i64)>, PathRejection>,
) -> Result<Json<BucketItem>, AppError> {
    let Path((bucketlist_id, item_id)) = ids?;
    Ok(Json(
        state.store.get_item(user.id, bucketlist_id, item_id).await?,
    ))
}

/// PUT `/bucketlists/{id}/items/{item_id}`: change `name` and/or `done`.
pub async fn update_item(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ids: Result<Path<(i64, i64)>, PathRejection>,
    JsonBody(payload): JsonBody<BucketItemReq>,
) -> Result<Json<BucketItem>, AppError> {
    let Path((bucketlist_id, item_id)) = ids?;
    let changes = ItemChanges {
        name: payload.name,
        done: payload.done,
    };
    let item = state
        .store
        .update_item(user.id, bucketlist_id, item_id, changes)
        .await?;
    info!(bucketlist_id, item_id, done = item.done, "updated item");
    Ok(Json(item))
}

/// DELETE `/bucketlists/{id}/items/{item_id}`
pub async fn delete_item(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ids: Result<Path<(i64, i64)>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path((bucketlist_id, item_id)) = ids?;
    state
        .store
        .delete_item(user.id, bucketlist_id, item_id)
        .await?;
    info!(bucketlist_id, item_id, "deleted item");
    Ok(Json(MessageResponse {
        message: format!("item {item_id} deleted"),
    }))
}
