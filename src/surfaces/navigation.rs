use crate::models::{ItemId, MediaKind};

/// Detail page address for an item
pub fn detail_path(kind: MediaKind, id: &ItemId) -> String {
    match kind {
        MediaKind::Movie => format!("moviedetail/{}", id),
        MediaKind::Series => format!("tvseriesdetail/{}", id),
    }
}

/// Accessible label of the detail link
pub fn detail_label(kind: MediaKind, id: &ItemId) -> String {
    match kind {
        MediaKind::Movie => format!("moviedetail of {}", id),
        MediaKind::Series => format!("tvseriesdetail of {}", id),
    }
}

/// Full artwork URL, `None` when the item has no image
pub fn image_url(base: &str, backdrop_path: Option<&str>) -> Option<String> {
    backdrop_path
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map(|path| format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/')))
}
