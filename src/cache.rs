use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    error::BookmarkResult,
    models::{Bookmark, ItemId, QueryContext},
    store::BookmarkStore,
};

/// Result of a membership refetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refetch {
    /// The fetched list replaced the cached snapshot
    Applied(Vec<Bookmark>),
    /// The context moved on, or a later fetch already landed, while this one was in flight
    Superseded,
}

impl Refetch {
    pub fn is_applied(&self) -> bool {
        matches!(self, Refetch::Applied(_))
    }
}

struct CacheState {
    context: QueryContext,
    bookmarks: Vec<Bookmark>,
    item_ids: HashSet<ItemId>,
    /// Ticket handed to the most recently issued fetch
    issued: u64,
    /// Ticket of the fetch the snapshot came from
    applied: u64,
    /// Bumped on every context transition
    epoch: u64,
}

impl CacheState {
    fn replace(&mut self, bookmarks: Vec<Bookmark>) {
        self.item_ids = bookmarks.iter().map(|b| b.item_id.clone()).collect();
        self.bookmarks = bookmarks;
    }

    /// Hands out a ticket for a fetch under `context`, switching to it first
    fn issue(&mut self, context: &QueryContext) -> u64 {
        if &self.context != context {
            tracing::debug!(
                from = %self.context,
                to = %context,
                "Bookmark context changed, dropping cached snapshot"
            );
            self.context = context.clone();
            self.replace(Vec::new());
            self.applied = self.issued;
            self.epoch += 1;
        }
        self.issued += 1;
        self.issued
    }
}

/// Client-side copy of the bookmark list for one query context
///
/// Holds the last applied `list` result and answers membership lookups from
/// it. Never patched locally: every change goes through a full refetch.
pub struct MembershipCache {
    store: Arc<dyn BookmarkStore>,
    state: RwLock<CacheState>,
}

impl MembershipCache {
    pub fn new(store: Arc<dyn BookmarkStore>) -> Self {
        Self {
            store,
            state: RwLock::new(CacheState {
                context: QueryContext::anonymous(),
                bookmarks: Vec::new(),
                item_ids: HashSet::new(),
                issued: 0,
                applied: 0,
                epoch: 0,
            }),
        }
    }

    /// Context the current snapshot belongs to
    pub async fn context(&self) -> QueryContext {
        self.state.read().await.context.clone()
    }

    pub async fn is_bookmarked(&self, item_id: &ItemId) -> bool {
        self.state.read().await.item_ids.contains(item_id)
    }

    /// Membership under `context`; never true for a snapshot of another context
    pub async fn is_bookmarked_in(&self, context: &QueryContext, item_id: &ItemId) -> bool {
        let state = self.state.read().await;
        &state.context == context && state.item_ids.contains(item_id)
    }

    /// Context generation, to be compared across a suspension point
    pub async fn epoch(&self) -> u64 {
        self.state.read().await.epoch
    }

    pub async fn bookmarks(&self) -> Vec<Bookmark> {
        self.state.read().await.bookmarks.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.bookmarks.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Replaces the snapshot with a fresh `list` for `context`
    ///
    /// A context different from the cached one clears the snapshot right away
    /// and invalidates every fetch still in flight. Anonymous contexts resolve
    /// to an empty snapshot without touching the store. On store failure the
    /// snapshot is left as it was.
    pub async fn invalidate_and_refetch(&self, context: &QueryContext) -> BookmarkResult<Refetch> {
        let ticket = self.state.write().await.issue(context);
        self.fetch(context, ticket).await
    }

    /// Refetch following a mutation made under `context`
    ///
    /// `epoch` is read when the mutation starts. If the context changed while
    /// the mutation was in flight, the context current now is refetched
    /// instead, and the cache is never switched back to the mutation's one.
    pub async fn refetch_after(&self, context: &QueryContext, epoch: u64) -> BookmarkResult<Refetch> {
        let (target, ticket) = {
            let mut state = self.state.write().await;
            let target = if state.epoch == epoch {
                context.clone()
            } else {
                tracing::debug!(
                    mutation = %context,
                    current = %state.context,
                    "Context moved during mutation, refetching the current one"
                );
                state.context.clone()
            };
            let ticket = state.issue(&target);
            (target, ticket)
        };
        self.fetch(&target, ticket).await
    }

    async fn fetch(&self, context: &QueryContext, ticket: u64) -> BookmarkResult<Refetch> {
        let bookmarks = match context.query() {
            Some(query) => self.store.list(&query).await?,
            None => Vec::new(),
        };

        Ok(self.apply(context, ticket, bookmarks).await)
    }

    async fn apply(&self, context: &QueryContext, ticket: u64, bookmarks: Vec<Bookmark>) -> Refetch {
        let mut state = self.state.write().await;

        if &state.context != context || ticket <= state.applied {
            tracing::debug!(
                context = %context,
                current = %state.context,
                ticket,
                applied = state.applied,
                "Discarding superseded bookmark fetch"
            );
            return Refetch::Superseded;
        }

        state.applied = ticket;
        state.replace(bookmarks.clone());

        tracing::info!(
            context = %context,
            ticket,
            bookmarks = bookmarks.len(),
            "Bookmark snapshot refreshed"
        );

        Refetch::Applied(bookmarks)
    }
}
