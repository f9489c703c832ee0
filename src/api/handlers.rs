use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{BookmarkError, BookmarkResult},
    middleware::request_id::RequestId,
    models::{Bookmark, BookmarkQuery, ItemId, NewBookmarkRequest, UserId},
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub user: Option<String>,
    pub keyword: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserParam {
    pub user: Option<String>,
}

/// A missing or blank user means nobody is logged in
fn require_user(user: Option<String>) -> BookmarkResult<UserId> {
    user.filter(|u| !u.trim().is_empty())
        .map(UserId::new)
        .ok_or(BookmarkError::AuthRequired)
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// List a user's bookmarks, optionally filtered by keyword
pub async fn list_bookmarks(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<ListParams>,
) -> BookmarkResult<Json<Vec<Bookmark>>> {
    let user = require_user(params.user)?;
    let query = BookmarkQuery::new(user, params.keyword);

    let bookmarks = state.store.list(&query).await?;

    tracing::info!(
        request_id = %request_id,
        user = %query.user,
        keyword = query.keyword.as_deref().unwrap_or(""),
        results = bookmarks.len(),
        "Listed bookmarks"
    );

    Ok(Json(bookmarks))
}

/// Create a bookmark from the item snapshot in the body
pub async fn create_bookmark(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<NewBookmarkRequest>,
) -> BookmarkResult<(StatusCode, Json<Bookmark>)> {
    let user = require_user(request.user.map(|u| u.to_string()))?;

    let bookmark = state
        .store
        .add(&user, &request.item_id, &request.snapshot)
        .await
        .map_err(|e| {
            tracing::info!(request_id = %request_id, user = %user, error = %e, "Bookmark rejected");
            e
        })?;

    tracing::info!(
        request_id = %request_id,
        user = %user,
        item_id = %bookmark.item_id,
        bookmark_id = %bookmark.id,
        "Created bookmark"
    );

    Ok((StatusCode::CREATED, Json(bookmark)))
}

/// Delete the user's bookmark for one item
pub async fn delete_bookmark(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(item_id): Path<String>,
    Query(params): Query<UserParam>,
) -> BookmarkResult<StatusCode> {
    let user = require_user(params.user)?;
    let item_id = ItemId::new(item_id);

    state.store.remove(&user, &item_id).await?;

    tracing::info!(
        request_id = %request_id,
        user = %user,
        item_id = %item_id,
        "Deleted bookmark"
    );

    Ok(StatusCode::NO_CONTENT)
}
