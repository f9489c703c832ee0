use std::sync::Arc;

use crate::store::{BookmarkStore, InMemoryBookmarkStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BookmarkStore>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Creates a state backed by an empty in-memory store
    pub fn new() -> Self {
        Self::with_store(Arc::new(InMemoryBookmarkStore::new()))
    }

    pub fn with_store(store: Arc<dyn BookmarkStore>) -> Self {
        Self { store }
    }
}
