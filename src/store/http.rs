//! HTTP bookmark store
//!
//! Talks to the bookmark REST API:
//! 1. List:   GET    {base}/bookmarks?user={id}&keyword={kw}
//! 2. Add:    POST   {base}/bookmarks
//! 3. Remove: DELETE {base}/bookmarks/{item_id}?user={id}
//!
//! Error bodies are `{"message": "..."}`; that message is kept so the user
//! sees what the server said.
use std::time::Duration;

use reqwest::{Client as HttpClient, Response, StatusCode, Url};
use serde::Deserialize;

use crate::{
    config::Config,
    error::{BookmarkError, BookmarkResult},
    models::{Bookmark, BookmarkQuery, BookmarkSnapshot, ItemId, NewBookmarkRequest, UserId},
    store::BookmarkStore,
};

#[derive(Clone)]
pub struct HttpBookmarkStore {
    http_client: HttpClient,
    api_url: String,
}

/// Store call a failed response belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    List,
    Add,
    Remove,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl HttpBookmarkStore {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> BookmarkResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> BookmarkResult<Self> {
        Self::new(
            config.store_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn bookmarks_url(&self) -> String {
        format!("{}/bookmarks", self.api_url)
    }

    /// Turns a non-success response into the matching store error
    async fn error_from_response(operation: Operation, response: Response) -> BookmarkError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty());

        tracing::warn!(
            operation = ?operation,
            status = %status,
            message = message.as_deref().unwrap_or(""),
            "Bookmark API returned an error"
        );

        Self::classify(operation, status, message)
    }

    /// Listing only ever fails with `Transport`; a 404 counts as `NotFound`
    /// for removals alone
    fn classify(operation: Operation, status: StatusCode, message: Option<String>) -> BookmarkError {
        match (operation, status) {
            (Operation::Add, StatusCode::CONFLICT) => BookmarkError::Conflict(
                message.unwrap_or_else(|| "Item is already bookmarked".to_string()),
            ),
            (Operation::Add, StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY) => {
                BookmarkError::Validation(
                    message.unwrap_or_else(|| "Invalid bookmark".to_string()),
                )
            }
            (Operation::Remove, StatusCode::NOT_FOUND) => BookmarkError::NotFound(
                message.unwrap_or_else(|| "Bookmark not found".to_string()),
            ),
            _ => BookmarkError::Transport(message),
        }
    }
}

#[async_trait::async_trait]
impl BookmarkStore for HttpBookmarkStore {
    async fn list(&self, query: &BookmarkQuery) -> BookmarkResult<Vec<Bookmark>> {
        let mut params = vec![("user", query.user.as_str())];
        if let Some(keyword) = query.keyword.as_deref() {
            params.push(("keyword", keyword));
        }

        let response = self
            .http_client
            .get(self.bookmarks_url())
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(Operation::List, response).await);
        }

        let bookmarks: Vec<Bookmark> = response.json().await?;

        tracing::info!(
            user = %query.user,
            keyword = query.keyword.as_deref().unwrap_or(""),
            results = bookmarks.len(),
            store = self.name(),
            "Bookmarks fetched"
        );

        Ok(bookmarks)
    }

    async fn add(
        &self,
        user: &UserId,
        item_id: &ItemId,
        snapshot: &BookmarkSnapshot,
    ) -> BookmarkResult<Bookmark> {
        let body = NewBookmarkRequest {
            user: Some(user.clone()),
            item_id: item_id.clone(),
            snapshot: snapshot.clone(),
        };

        let response = self
            .http_client
            .post(self.bookmarks_url())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(Operation::Add, response).await);
        }

        let bookmark: Bookmark = response.json().await?;
        tracing::info!(user = %user, item_id = %item_id, store = self.name(), "Bookmark created");

        Ok(bookmark)
    }

    async fn remove(&self, user: &UserId, item_id: &ItemId) -> BookmarkResult<()> {
        let mut url = Url::parse(&self.bookmarks_url())
            .map_err(|e| BookmarkError::Transport(Some(format!("Invalid store URL: {}", e))))?;
        url.path_segments_mut()
            .map_err(|_| BookmarkError::Transport(Some("Store URL cannot be a base".to_string())))?
            .push(item_id.as_str());

        let response = self
            .http_client
            .delete(url)
            .query(&[("user", user.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(Operation::Remove, response).await);
        }

        tracing::info!(user = %user, item_id = %item_id, store = self.name(), "Bookmark deleted");

        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let store = HttpBookmarkStore::new("http://test.local/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(store.bookmarks_url(), "http://test.local/api/bookmarks");
    }

    #[test]
    fn test_classify_conflict_keeps_server_message() {
        let err = HttpBookmarkStore::classify(
            Operation::Add,
            StatusCode::CONFLICT,
            Some("Bookmark already exists".to_string()),
        );
        assert_eq!(err, BookmarkError::Conflict("Bookmark already exists".to_string()));
    }

    #[test]
    fn test_classify_defaults() {
        assert!(matches!(
            HttpBookmarkStore::classify(Operation::Remove, StatusCode::NOT_FOUND, None),
            BookmarkError::NotFound(_)
        ));
        assert!(matches!(
            HttpBookmarkStore::classify(Operation::Add, StatusCode::UNPROCESSABLE_ENTITY, None),
            BookmarkError::Validation(_)
        ));
        assert_eq!(
            HttpBookmarkStore::classify(Operation::Add, StatusCode::INTERNAL_SERVER_ERROR, None),
            BookmarkError::Transport(None)
        );
        assert_eq!(
            HttpBookmarkStore::classify(
                Operation::Remove,
                StatusCode::BAD_GATEWAY,
                Some("upstream down".to_string())
            ),
            BookmarkError::Transport(Some("upstream down".to_string()))
        );
    }

    #[test]
    fn test_not_found_outside_remove_is_transport() {
        assert_eq!(
            HttpBookmarkStore::classify(Operation::List, StatusCode::NOT_FOUND, None),
            BookmarkError::Transport(None)
        );
        assert_eq!(
            HttpBookmarkStore::classify(Operation::Add, StatusCode::NOT_FOUND, None),
            BookmarkError::Transport(None)
        );
    }

    #[test]
    fn test_list_failures_are_transport() {
        for status in [StatusCode::BAD_REQUEST, StatusCode::CONFLICT, StatusCode::UNAUTHORIZED] {
            assert_eq!(
                HttpBookmarkStore::classify(Operation::List, status, Some("nope".to_string())),
                BookmarkError::Transport(Some("nope".to_string()))
            );
        }
    }

    #[test]
    fn test_error_body_deserialization() {
        let body: ErrorBody = serde_json::from_str(r#"{"message": "Bookmark not found"}"#).unwrap();
        assert_eq!(body.message.as_deref(), Some("Bookmark not found"));

        let empty: ErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.message, None);
    }
}
