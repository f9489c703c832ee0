use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;

pub mod bookmark;
pub mod context;
pub mod media;

pub use bookmark::{Bookmark, BookmarkId, BookmarkQuery, BookmarkSnapshot, NewBookmarkRequest};
pub use context::QueryContext;
pub use media::{MediaItem, MediaKind};

/// Identifier of a catalogue item (movie or series)
///
/// Upstream catalogues hand out numeric ids while the bookmark API stores
/// strings, so both deserialize into the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => ItemId::from(n),
            RawId::Text(s) => ItemId(s),
        })
    }
}

/// Identifier of an authenticated user, as supplied by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// What a remove action points at
///
/// Grid and carousel cards hold raw media items and remove by `id`; the
/// bookmarks page holds bookmarks and removes by their `itemId`. Callers pick
/// the variant explicitly, both resolve to the same item id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalTarget {
    ByItemId(ItemId),
    ByBookmarkRef(ItemId),
}

impl RemovalTarget {
    pub fn item_id(&self) -> &ItemId {
        match self {
            RemovalTarget::ByItemId(id) | RemovalTarget::ByBookmarkRef(id) => id,
        }
    }
}

impl From<&MediaItem> for RemovalTarget {
    fn from(item: &MediaItem) -> Self {
        RemovalTarget::ByItemId(item.id.clone())
    }
}

impl From<&Bookmark> for RemovalTarget {
    fn from(bookmark: &Bookmark) -> Self {
        RemovalTarget::ByBookmarkRef(bookmark.item_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_id_from_number_and_string() {
        let from_number: ItemId = serde_json::from_value(json!(438631)).unwrap();
        let from_string: ItemId = serde_json::from_value(json!("438631")).unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(serde_json::to_value(&from_number).unwrap(), json!("438631"));
    }

    #[test]
    fn test_blank_item_id() {
        assert!(ItemId::new("  ").is_blank());
        assert!(!ItemId::new("7").is_blank());
    }

    #[test]
    fn test_dual_addressing_resolves_same_target() {
        let bookmark: Bookmark = serde_json::from_value(json!({
            "_id": "2f0c6f1e-7c43-4e57-9a55-3f1f0f1ad001",
            "user": "u1",
            "itemId": "42",
            "title": "Arrival",
            "release_date": "2016-11-11",
            "createdAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        let item: MediaItem = serde_json::from_value(json!({
            "id": "42",
            "title": "Arrival",
            "release_date": "2016-11-11"
        }))
        .unwrap();

        let from_bookmark = RemovalTarget::from(&bookmark);
        let from_item = RemovalTarget::from(&item);

        assert!(matches!(from_bookmark, RemovalTarget::ByBookmarkRef(_)));
        assert!(matches!(from_item, RemovalTarget::ByItemId(_)));
        assert_eq!(from_bookmark.item_id(), from_item.item_id());
        assert_eq!(from_item.item_id().as_str(), "42");
    }
}
