use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

use super::media::{display_name, non_empty};
use super::{ItemId, MediaItem, MediaKind, UserId};
use crate::error::{BookmarkError, BookmarkResult};

/// Identifier the store assigns to a bookmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookmarkId(pub Uuid);

impl BookmarkId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BookmarkId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for BookmarkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display data copied from the item when it was bookmarked
///
/// The bookmarks page renders from this alone, without going back to the
/// catalogue.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookmarkSnapshot {
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
}

impl BookmarkSnapshot {
    /// A snapshot needs a display name and a date to be rendered
    pub fn validate(&self) -> BookmarkResult<()> {
        if display_name(self.title.as_deref(), self.name.as_deref()).is_none() {
            return Err(BookmarkError::Validation(
                "Bookmark requires a title or a name".to_string(),
            ));
        }
        if non_empty(self.release_date.as_deref()).is_none()
            && non_empty(self.first_air_date.as_deref()).is_none()
        {
            return Err(BookmarkError::Validation(
                "Bookmark requires a release date or a first air date".to_string(),
            ));
        }
        Ok(())
    }

    pub fn display_name(&self) -> Option<&str> {
        display_name(self.title.as_deref(), self.name.as_deref())
    }

    pub fn kind(&self) -> MediaKind {
        MediaKind::from_dates(self.release_date.as_deref(), self.first_air_date.as_deref())
    }

    /// Case-insensitive substring match on the display name
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let needle = keyword.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.display_name()
            .map(|name| name.to_lowercase().contains(&needle))
            .unwrap_or(false)
    }
}

impl From<&MediaItem> for BookmarkSnapshot {
    fn from(item: &MediaItem) -> Self {
        let keep = |value: &Option<String>| non_empty(value.as_deref()).map(str::to_string);
        Self {
            backdrop_path: keep(&item.backdrop_path),
            title: keep(&item.title),
            name: keep(&item.name),
            release_date: keep(&item.release_date),
            first_air_date: keep(&item.first_air_date),
        }
    }
}

/// A user's saved item as held by the bookmark store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bookmark {
    #[serde(rename = "_id")]
    pub id: BookmarkId,
    pub user: UserId,
    #[serde(rename = "itemId")]
    pub item_id: ItemId,
    #[serde(flatten)]
    pub snapshot: BookmarkSnapshot,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Bookmark {
    pub fn new(user: UserId, item_id: ItemId, snapshot: BookmarkSnapshot) -> Self {
        Self {
            id: BookmarkId::new(),
            user,
            item_id,
            snapshot,
            created_at: Utc::now(),
        }
    }

    /// Rebuilds the media item a bookmark was taken from
    pub fn to_media_item(&self) -> MediaItem {
        MediaItem {
            id: self.item_id.clone(),
            title: self.snapshot.title.clone(),
            name: self.snapshot.name.clone(),
            release_date: self.snapshot.release_date.clone(),
            first_air_date: self.snapshot.first_air_date.clone(),
            backdrop_path: self.snapshot.backdrop_path.clone(),
            adult: false,
        }
    }
}

/// Scope of a `list` call against the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkQuery {
    pub user: UserId,
    pub keyword: Option<String>,
}

impl BookmarkQuery {
    pub fn new(user: UserId, keyword: Option<String>) -> Self {
        Self {
            user,
            keyword: keyword.filter(|k| !k.trim().is_empty()),
        }
    }
}

/// Body of `POST /api/bookmarks`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBookmarkRequest {
    #[serde(default)]
    pub user: Option<UserId>,
    #[serde(rename = "itemId")]
    pub item_id: ItemId,
    #[serde(flatten)]
    pub snapshot: BookmarkSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snapshot_from_movie() {
        let item = MediaItem::movie("7", "Dune", "2021-10-22").with_backdrop("/dune.jpg");
        let snapshot = BookmarkSnapshot::from(&item);

        assert_eq!(snapshot.title.as_deref(), Some("Dune"));
        assert_eq!(snapshot.name, None);
        assert_eq!(snapshot.backdrop_path.as_deref(), Some("/dune.jpg"));
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_snapshot_validation_requires_name() {
        let snapshot = BookmarkSnapshot {
            release_date: Some("2021-10-22".to_string()),
            ..Default::default()
        };
        assert!(matches!(snapshot.validate(), Err(BookmarkError::Validation(_))));
    }

    #[test]
    fn test_snapshot_validation_requires_date() {
        let snapshot = BookmarkSnapshot {
            name: Some("Severance".to_string()),
            first_air_date: Some("".to_string()),
            ..Default::default()
        };
        assert!(matches!(snapshot.validate(), Err(BookmarkError::Validation(_))));
    }

    #[test]
    fn test_matches_keyword() {
        let snapshot = BookmarkSnapshot {
            title: Some("Mad Max: Fury Road".to_string()),
            release_date: Some("2015-05-15".to_string()),
            ..Default::default()
        };
        assert!(snapshot.matches_keyword("fury"));
        assert!(snapshot.matches_keyword(""));
        assert!(!snapshot.matches_keyword("action"));
    }

    #[test]
    fn test_bookmark_wire_format() {
        let bookmark = Bookmark::new(
            UserId::from("u1"),
            ItemId::from("7"),
            BookmarkSnapshot::from(&MediaItem::movie("7", "Dune", "2021-10-22")),
        );
        let value = serde_json::to_value(&bookmark).unwrap();

        assert_eq!(value["user"], json!("u1"));
        assert_eq!(value["itemId"], json!("7"));
        assert_eq!(value["title"], json!("Dune"));
        assert!(value.get("_id").is_some());
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn test_query_drops_blank_keyword() {
        let query = BookmarkQuery::new(UserId::from("u1"), Some("  ".to_string()));
        assert_eq!(query.keyword, None);
    }
}
