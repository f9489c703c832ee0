use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::{
    cache::{MembershipCache, Refetch},
    error::{BookmarkError, BookmarkResult},
    models::{BookmarkSnapshot, ItemId, MediaItem, QueryContext, RemovalTarget},
    notify::{NotificationSink, Severity},
    store::BookmarkStore,
    surfaces::Surface,
};

pub const BOOKMARK_ADDED: &str = "Bookmark added successfully";
pub const BOOKMARK_REMOVED: &str = "Bookmark removed successfully";
pub const ADD_FAILED: &str = "Error adding bookmark";
pub const REMOVE_FAILED: &str = "Error removing bookmark";
pub const LOGIN_REQUIRED_TO_ADD: &str = "You must be logged in to add bookmarks";
pub const LOGIN_REQUIRED_TO_REMOVE: &str = "You must be logged in to remove bookmarks";

/// Bookmark state of one item as seen from one surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkState {
    Unauthenticated,
    NotBookmarked,
    Bookmarked,
}

/// What a toggle action ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    /// The store already had it; treated as a successful add
    AlreadyBookmarked,
    Removed,
    /// The store no longer had it; treated as a successful remove
    AlreadyRemoved,
    /// A mutation for the same item is still in flight
    Busy,
    Rejected(BookmarkError),
}

impl ToggleOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            ToggleOutcome::Added
                | ToggleOutcome::AlreadyBookmarked
                | ToggleOutcome::Removed
                | ToggleOutcome::AlreadyRemoved
        )
    }
}

/// Marks an item as having a mutation in flight until dropped
struct PendingSlot<'a> {
    pending: &'a Mutex<HashSet<ItemId>>,
    item_id: ItemId,
}

impl Drop for PendingSlot<'_> {
    fn drop(&mut self) {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&self.item_id);
    }
}

/// Decides between add and remove, talks to the store and keeps the
/// membership cache in line with it
///
/// Every store error is turned into exactly one notification here and
/// reported through `ToggleOutcome`; nothing is propagated further. Each
/// successful mutation is followed by exactly one refetch, issued after the
/// store call has completed.
pub struct ToggleController {
    store: Arc<dyn BookmarkStore>,
    cache: Arc<MembershipCache>,
    notifier: Arc<dyn NotificationSink>,
    pending: Mutex<HashSet<ItemId>>,
}

impl ToggleController {
    pub fn new(
        store: Arc<dyn BookmarkStore>,
        cache: Arc<MembershipCache>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            store,
            cache,
            notifier,
            pending: Mutex::new(HashSet::new()),
        }
    }

    /// Builds a controller with its own cache over `store`
    pub fn with_store(store: Arc<dyn BookmarkStore>, notifier: Arc<dyn NotificationSink>) -> Self {
        let cache = Arc::new(MembershipCache::new(store.clone()));
        Self::new(store, cache, notifier)
    }

    pub fn cache(&self) -> &Arc<MembershipCache> {
        &self.cache
    }

    /// Whether `item_id` is bookmarked under `context`
    ///
    /// False until the cache holds a snapshot for exactly this context.
    pub async fn is_bookmarked(&self, context: &QueryContext, item_id: &ItemId) -> bool {
        self.cache.is_bookmarked_in(context, item_id).await
    }

    pub fn is_pending(&self, item_id: &ItemId) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(item_id)
    }

    /// Bookmark state of `item_id` on `surface`
    ///
    /// The bookmarks page lists nothing but bookmarks, so everything on it is
    /// bookmarked without a lookup. Elsewhere a snapshot taken for another
    /// context never counts.
    pub async fn membership(
        &self,
        context: &QueryContext,
        surface: Surface,
        item_id: &ItemId,
    ) -> BookmarkState {
        if context.is_anonymous() {
            return BookmarkState::Unauthenticated;
        }
        if surface == Surface::BookmarksPage || self.is_bookmarked(context, item_id).await {
            BookmarkState::Bookmarked
        } else {
            BookmarkState::NotBookmarked
        }
    }

    /// Loads the snapshot for `context`, replacing whatever the cache held
    ///
    /// Hosts call this when the user logs in or out or the keyword changes.
    pub async fn refresh(&self, context: &QueryContext) -> BookmarkResult<Refetch> {
        self.cache.invalidate_and_refetch(context).await
    }

    pub async fn toggle_add(&self, context: &QueryContext, item: &MediaItem) -> ToggleOutcome {
        let Some(user) = context.user.as_ref() else {
            self.notifier.notify(Severity::Error, LOGIN_REQUIRED_TO_ADD);
            return ToggleOutcome::Rejected(BookmarkError::AuthRequired);
        };
        let Some(_slot) = self.claim(&item.id) else {
            tracing::debug!(item_id = %item.id, "Bookmark mutation already pending");
            return ToggleOutcome::Busy;
        };

        let epoch = self.cache.epoch().await;
        let snapshot = BookmarkSnapshot::from(item);
        let outcome = match self.store.add(user, &item.id, &snapshot).await {
            Ok(_) => {
                tracing::info!(user = %user, item_id = %item.id, "Bookmark added");
                ToggleOutcome::Added
            }
            Err(BookmarkError::Conflict(reason)) => {
                tracing::info!(
                    user = %user,
                    item_id = %item.id,
                    reason = %reason,
                    "Bookmark already present, reconciling"
                );
                ToggleOutcome::AlreadyBookmarked
            }
            Err(e) => {
                tracing::warn!(user = %user, item_id = %item.id, error = %e, "Adding bookmark failed");
                self.notifier.notify(Severity::Error, &e.user_message(ADD_FAILED));
                return ToggleOutcome::Rejected(e);
            }
        };

        self.notifier.notify(Severity::Success, BOOKMARK_ADDED);
        self.reconcile(context, epoch).await;
        outcome
    }

    pub async fn toggle_remove(&self, context: &QueryContext, target: &RemovalTarget) -> ToggleOutcome {
        let Some(user) = context.user.as_ref() else {
            self.notifier.notify(Severity::Error, LOGIN_REQUIRED_TO_REMOVE);
            return ToggleOutcome::Rejected(BookmarkError::AuthRequired);
        };
        let item_id = target.item_id();
        let Some(_slot) = self.claim(item_id) else {
            tracing::debug!(item_id = %item_id, "Bookmark mutation already pending");
            return ToggleOutcome::Busy;
        };

        let epoch = self.cache.epoch().await;
        let outcome = match self.store.remove(user, item_id).await {
            Ok(()) => {
                tracing::info!(user = %user, item_id = %item_id, removal = ?target, "Bookmark removed");
                ToggleOutcome::Removed
            }
            Err(BookmarkError::NotFound(reason)) => {
                tracing::info!(
                    user = %user,
                    item_id = %item_id,
                    reason = %reason,
                    "Bookmark already gone, reconciling"
                );
                ToggleOutcome::AlreadyRemoved
            }
            Err(e) => {
                tracing::warn!(user = %user, item_id = %item_id, error = %e, "Removing bookmark failed");
                self.notifier.notify(Severity::Error, &e.user_message(REMOVE_FAILED));
                return ToggleOutcome::Rejected(e);
            }
        };

        self.notifier.notify(Severity::Success, BOOKMARK_REMOVED);
        self.reconcile(context, epoch).await;
        outcome
    }

    fn claim(&self, item_id: &ItemId) -> Option<PendingSlot<'_>> {
        let mut pending = self
            .pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !pending.insert(item_id.clone()) {
            return None;
        }
        Some(PendingSlot {
            pending: &self.pending,
            item_id: item_id.clone(),
        })
    }

    /// Refetch after a confirmed mutation; failures only reach the log
    async fn reconcile(&self, context: &QueryContext, epoch: u64) {
        match self.cache.refetch_after(context, epoch).await {
            Ok(Refetch::Applied(bookmarks)) => {
                tracing::debug!(context = %context, bookmarks = bookmarks.len(), "Bookmarks reconciled");
            }
            Ok(Refetch::Superseded) => {
                tracing::debug!(context = %context, "Reconciling fetch superseded");
            }
            Err(e) => {
                tracing::warn!(context = %context, error = %e, "Bookmark refetch failed after mutation");
            }
        }
    }
}
