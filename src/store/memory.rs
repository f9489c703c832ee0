use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    error::{BookmarkError, BookmarkResult},
    models::{Bookmark, BookmarkQuery, BookmarkSnapshot, ItemId, UserId},
    store::BookmarkStore,
};

/// Bookmark store held in process memory
///
/// Backs the reference bookmark service and the test suites. Cloning shares
/// the underlying data.
#[derive(Clone, Default)]
pub struct InMemoryBookmarkStore {
    inner: Arc<RwLock<HashMap<UserId, Vec<Bookmark>>>>,
}

impl InMemoryBookmarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bookmarks a user holds for one item
    pub async fn count_for(&self, user: &UserId, item_id: &ItemId) -> usize {
        let inner = self.inner.read().await;
        inner
            .get(user)
            .map(|bookmarks| bookmarks.iter().filter(|b| &b.item_id == item_id).count())
            .unwrap_or(0)
    }

    pub async fn total(&self) -> usize {
        self.inner.read().await.values().map(Vec::len).sum()
    }
}

#[async_trait::async_trait]
impl BookmarkStore for InMemoryBookmarkStore {
    async fn list(&self, query: &BookmarkQuery) -> BookmarkResult<Vec<Bookmark>> {
        let inner = self.inner.read().await;
        let bookmarks: Vec<Bookmark> = inner
            .get(&query.user)
            .map(|bookmarks| {
                bookmarks
                    .iter()
                    .filter(|b| {
                        query
                            .keyword
                            .as_deref()
                            .map_or(true, |k| b.snapshot.matches_keyword(k))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        tracing::debug!(
            user = %query.user,
            keyword = query.keyword.as_deref().unwrap_or(""),
            results = bookmarks.len(),
            store = self.name(),
            "Bookmarks listed"
        );

        Ok(bookmarks)
    }

    async fn add(
        &self,
        user: &UserId,
        item_id: &ItemId,
        snapshot: &BookmarkSnapshot,
    ) -> BookmarkResult<Bookmark> {
        if item_id.is_blank() {
            return Err(BookmarkError::Validation(
                "Bookmark requires an item id".to_string(),
            ));
        }
        snapshot.validate()?;

        let mut inner = self.inner.write().await;
        let bookmarks = inner.entry(user.clone()).or_default();

        if bookmarks.iter().any(|b| &b.item_id == item_id) {
            return Err(BookmarkError::Conflict(
                "Item is already bookmarked".to_string(),
            ));
        }

        let bookmark = Bookmark::new(user.clone(), item_id.clone(), snapshot.clone());
        bookmarks.push(bookmark.clone());

        tracing::info!(user = %user, item_id = %item_id, store = self.name(), "Bookmark created");

        Ok(bookmark)
    }

    async fn remove(&self, user: &UserId, item_id: &ItemId) -> BookmarkResult<()> {
        let mut inner = self.inner.write().await;
        let bookmarks = inner.get_mut(user);

        let removed = match bookmarks {
            Some(bookmarks) => {
                let before = bookmarks.len();
                bookmarks.retain(|b| &b.item_id != item_id);
                before != bookmarks.len()
            }
            None => false,
        };

        if !removed {
            return Err(BookmarkError::NotFound("Bookmark not found".to_string()));
        }

        tracing::info!(user = %user, item_id = %item_id, store = self.name(), "Bookmark deleted");

        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
