//! Card view models for the grid, the trending carousel and the bookmarks page
//!
//! Surfaces hold no state. They ask the controller for membership when
//! rendering and hand clicks on the bookmark icon back to it.
use std::sync::Arc;

use serde::Serialize;

use crate::{
    config::Config,
    controller::{BookmarkState, ToggleController, ToggleOutcome},
    models::{
        media::year_of, Bookmark, ItemId, MediaItem, MediaKind, QueryContext, RemovalTarget,
    },
};

pub mod navigation;

pub use navigation::{detail_label, detail_path, image_url};

/// Cards whose name is this long or longer are left out of every surface
///
/// Measured in UTF-16 code units, the way browsers measure string length.
pub const MAX_DISPLAY_NAME_LEN: usize = 22;

fn display_len(name: &str) -> usize {
    name.encode_utf16().count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    Grid,
    Carousel,
    BookmarksPage,
}

/// What a card shows: a catalogue item, or a bookmark on the bookmarks page
#[derive(Debug, Clone, PartialEq)]
pub enum CardEntry {
    Media(MediaItem),
    Saved(Bookmark),
}

impl CardEntry {
    pub fn item_id(&self) -> &ItemId {
        match self {
            CardEntry::Media(item) => &item.id,
            CardEntry::Saved(bookmark) => &bookmark.item_id,
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        match self {
            CardEntry::Media(item) => item.display_name(),
            CardEntry::Saved(bookmark) => bookmark.snapshot.display_name(),
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            CardEntry::Media(item) => item.kind(),
            CardEntry::Saved(bookmark) => bookmark.snapshot.kind(),
        }
    }

    fn year(&self) -> Option<&str> {
        match self {
            CardEntry::Media(item) => {
                year_of(item.release_date.as_deref(), item.first_air_date.as_deref())
            }
            CardEntry::Saved(bookmark) => year_of(
                bookmark.snapshot.release_date.as_deref(),
                bookmark.snapshot.first_air_date.as_deref(),
            ),
        }
    }

    fn backdrop_path(&self) -> Option<&str> {
        match self {
            CardEntry::Media(item) => item.backdrop_path.as_deref(),
            CardEntry::Saved(bookmark) => bookmark.snapshot.backdrop_path.as_deref(),
        }
    }

    fn adult(&self) -> bool {
        matches!(self, CardEntry::Media(item) if item.adult)
    }

    /// Remove key for this entry's own shape
    pub fn removal_target(&self) -> RemovalTarget {
        match self {
            CardEntry::Media(item) => RemovalTarget::from(item),
            CardEntry::Saved(bookmark) => RemovalTarget::from(bookmark),
        }
    }

    fn media_item(&self) -> MediaItem {
        match self {
            CardEntry::Media(item) => item.clone(),
            CardEntry::Saved(bookmark) => bookmark.to_media_item(),
        }
    }
}

impl From<MediaItem> for CardEntry {
    fn from(item: MediaItem) -> Self {
        CardEntry::Media(item)
    }
}

impl From<Bookmark> for CardEntry {
    fn from(bookmark: Bookmark) -> Self {
        CardEntry::Saved(bookmark)
    }
}

/// State of the bookmark icon on a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Affordance {
    Add,
    Remove,
    /// A mutation for this item is in flight; the icon is disabled
    Busy,
}

/// Everything a host needs to draw one card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub key: ItemId,
    pub title: String,
    pub year: Option<String>,
    pub kind: MediaKind,
    pub kind_label: &'static str,
    pub rating: &'static str,
    pub image_url: Option<String>,
    pub detail_path: String,
    pub detail_label: String,
    pub affordance: Affordance,
}

/// Builds card views and routes bookmark clicks for every surface
#[derive(Clone)]
pub struct CardPresenter {
    controller: Arc<ToggleController>,
    image_base_url: String,
}

impl CardPresenter {
    pub fn new(controller: Arc<ToggleController>, image_base_url: impl Into<String>) -> Self {
        Self {
            controller,
            image_base_url: image_base_url.into(),
        }
    }

    pub fn from_config(controller: Arc<ToggleController>, config: &Config) -> Self {
        Self::new(controller, config.image_base_url.clone())
    }

    pub fn controller(&self) -> &Arc<ToggleController> {
        &self.controller
    }

    pub async fn render(
        &self,
        context: &QueryContext,
        surface: Surface,
        entries: &[CardEntry],
    ) -> Vec<CardView> {
        let mut cards = Vec::with_capacity(entries.len());

        for entry in entries {
            let Some(title) = entry.display_name() else {
                continue;
            };
            if display_len(title) >= MAX_DISPLAY_NAME_LEN {
                continue;
            }

            let affordance = self.affordance(context, surface, entry).await;
            let kind = entry.kind();
            let id = entry.item_id();

            cards.push(CardView {
                key: id.clone(),
                title: title.to_string(),
                year: entry.year().map(str::to_string),
                kind,
                kind_label: kind.label(),
                rating: if entry.adult() { "18+" } else { "PG" },
                image_url: image_url(&self.image_base_url, entry.backdrop_path()),
                detail_path: detail_path(kind, id),
                detail_label: detail_label(kind, id),
                affordance,
            });
        }

        cards
    }

    async fn affordance(&self, context: &QueryContext, surface: Surface, entry: &CardEntry) -> Affordance {
        if self.controller.is_pending(entry.item_id()) {
            return Affordance::Busy;
        }
        match self.controller.membership(context, surface, entry.item_id()).await {
            BookmarkState::Bookmarked => Affordance::Remove,
            BookmarkState::NotBookmarked | BookmarkState::Unauthenticated => Affordance::Add,
        }
    }

    /// Handles a click on a card's bookmark icon
    ///
    /// The bookmarks page always removes, keyed by the entry's own shape.
    /// Grid and carousel remove by item id when the item is bookmarked and
    /// add otherwise; anonymous users end up in the add path and get the
    /// login error from there.
    pub async fn click(&self, context: &QueryContext, surface: Surface, entry: &CardEntry) -> ToggleOutcome {
        if surface == Surface::BookmarksPage {
            return self
                .controller
                .toggle_remove(context, &entry.removal_target())
                .await;
        }

        match self.controller.membership(context, surface, entry.item_id()).await {
            BookmarkState::Bookmarked => {
                let target = RemovalTarget::ByItemId(entry.item_id().clone());
                self.controller.toggle_remove(context, &target).await
            }
            BookmarkState::NotBookmarked | BookmarkState::Unauthenticated => {
                self.controller.toggle_add(context, &entry.media_item()).await
            }
        }
    }
}
