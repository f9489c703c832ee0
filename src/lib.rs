//! Bookmark membership synchronization for media card surfaces.
//!
//! Keeps a user's bookmark state consistent between a remote bookmark store
//! and the grid, carousel and bookmarks-page views that render it.
pub mod api;
pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod middleware;
pub mod models;
pub mod notify;
pub mod store;
pub mod surfaces;

pub use cache::{MembershipCache, Refetch};
pub use config::Config;
pub use controller::{BookmarkState, ToggleController, ToggleOutcome};
pub use error::{BookmarkError, BookmarkResult};
pub use models::{Bookmark, ItemId, MediaItem, QueryContext, RemovalTarget, UserId};
pub use notify::{Notification, NotificationLog, NotificationSink, Severity, TracingNotifier};
pub use store::{BookmarkStore, HttpBookmarkStore, InMemoryBookmarkStore};
pub use surfaces::{Affordance, CardEntry, CardPresenter, CardView, Surface};
