use serde::{Deserialize, Serialize};

use super::ItemId;

/// Kind of a catalogue item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Series,
}

impl MediaKind {
    /// Movies carry a release date, series a first air date
    pub fn from_dates(release_date: Option<&str>, first_air_date: Option<&str>) -> Self {
        match (non_empty(release_date), non_empty(first_air_date)) {
            (None, Some(_)) => MediaKind::Series,
            _ => MediaKind::Movie,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Movie => "Movie",
            MediaKind::Series => "TV Show",
        }
    }
}

/// A movie or TV series as delivered by the catalogue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaItem {
    pub id: ItemId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub adult: bool,
}

impl MediaItem {
    pub fn movie(id: impl Into<String>, title: &str, release_date: &str) -> Self {
        Self {
            id: ItemId::new(id),
            title: Some(title.to_string()),
            name: None,
            release_date: Some(release_date.to_string()),
            first_air_date: None,
            backdrop_path: None,
            adult: false,
        }
    }

    pub fn series(id: impl Into<String>, name: &str, first_air_date: &str) -> Self {
        Self {
            id: ItemId::new(id),
            title: None,
            name: Some(name.to_string()),
            release_date: None,
            first_air_date: Some(first_air_date.to_string()),
            backdrop_path: None,
            adult: false,
        }
    }

    pub fn with_backdrop(mut self, path: &str) -> Self {
        self.backdrop_path = Some(path.to_string());
        self
    }

    pub fn kind(&self) -> MediaKind {
        MediaKind::from_dates(self.release_date.as_deref(), self.first_air_date.as_deref())
    }

    pub fn display_name(&self) -> Option<&str> {
        display_name(self.title.as_deref(), self.name.as_deref())
    }
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Title for movies, name for series
pub(crate) fn display_name<'a>(title: Option<&'a str>, name: Option<&'a str>) -> Option<&'a str> {
    non_empty(title).or(non_empty(name))
}

/// Four digit year of whichever date is populated
pub(crate) fn year_of<'a>(release_date: Option<&'a str>, first_air_date: Option<&'a str>) -> Option<&'a str> {
    non_empty(release_date)
        .or(non_empty(first_air_date))
        .and_then(|date| date.split('-').next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_from_dates() {
        assert_eq!(MediaKind::from_dates(Some("2021-10-22"), None), MediaKind::Movie);
        assert_eq!(MediaKind::from_dates(None, Some("2008-01-20")), MediaKind::Series);
        assert_eq!(MediaKind::from_dates(Some(""), Some("2008-01-20")), MediaKind::Series);
    }

    #[test]
    fn test_catalogue_payload_deserialization() {
        let item: MediaItem = serde_json::from_value(json!({
            "id": 1396,
            "name": "Breaking Bad",
            "first_air_date": "2008-01-20",
            "backdrop_path": "/tsRy63Mu5cu8etL1X7ZLyf7UP1M.jpg",
            "adult": false,
            "popularity": 512.3
        }))
        .unwrap();

        assert_eq!(item.id.as_str(), "1396");
        assert_eq!(item.kind(), MediaKind::Series);
        assert_eq!(item.display_name(), Some("Breaking Bad"));
    }

    #[test]
    fn test_year_of() {
        assert_eq!(year_of(Some("2021-10-22"), None), Some("2021"));
        assert_eq!(year_of(None, Some("2008-01-20")), Some("2008"));
        assert_eq!(year_of(None, None), None);
    }
}
