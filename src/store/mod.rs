//! Bookmark store abstraction
//!
//! The remote store is the only source of truth for bookmarks. Clients of this
//! module never keep state of their own: caching lives in `crate::cache`.
use crate::{
    error::BookmarkResult,
    models::{Bookmark, BookmarkQuery, BookmarkSnapshot, ItemId, UserId},
};

pub mod http;
pub mod memory;

pub use http::HttpBookmarkStore;
pub use memory::InMemoryBookmarkStore;

/// Trait for bookmark stores
///
/// Implementations must keep at most one bookmark per (user, item) and report
/// duplicates as `Conflict` and missing bookmarks as `NotFound`.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait BookmarkStore: Send + Sync {
    /// List a user's bookmarks, optionally narrowed by keyword
    ///
    /// Returns an empty list, never an error, when the user has none.
    async fn list(&self, query: &BookmarkQuery) -> BookmarkResult<Vec<Bookmark>>;

    /// Create a bookmark for `item_id` carrying the given display snapshot
    async fn add(
        &self,
        user: &UserId,
        item_id: &ItemId,
        snapshot: &BookmarkSnapshot,
    ) -> BookmarkResult<Bookmark>;

    /// Delete the user's bookmark for `item_id`
    async fn remove(&self, user: &UserId, item_id: &ItemId) -> BookmarkResult<()>;

    /// Store name for logging and debugging
    fn name(&self) -> &'static str;
}
