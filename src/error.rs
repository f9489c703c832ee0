use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Bookmark-level errors
///
/// Variants carry the store-supplied message where one exists, so the
/// controller can prefer it over its own generic fallback.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BookmarkError {
    #[error("You must be logged in to manage bookmarks")]
    AuthRequired,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Bookmark store unavailable{}", detail_suffix(.0))]
    Transport(Option<String>),
}

fn detail_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

impl BookmarkError {
    /// Message shown to the user, falling back when the store said nothing useful
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            BookmarkError::Validation(msg)
            | BookmarkError::Conflict(msg)
            | BookmarkError::NotFound(msg)
            | BookmarkError::Transport(Some(msg))
                if !msg.trim().is_empty() =>
            {
                msg.clone()
            }
            BookmarkError::AuthRequired => self.to_string(),
            _ => fallback.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            BookmarkError::AuthRequired => StatusCode::UNAUTHORIZED,
            BookmarkError::Validation(_) => StatusCode::BAD_REQUEST,
            BookmarkError::Conflict(_) => StatusCode::CONFLICT,
            BookmarkError::NotFound(_) => StatusCode::NOT_FOUND,
            BookmarkError::Transport(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<reqwest::Error> for BookmarkError {
    fn from(err: reqwest::Error) -> Self {
        tracing::warn!(error = %err, "Bookmark store request failed");
        BookmarkError::Transport(None)
    }
}

impl IntoResponse for BookmarkError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "message": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type BookmarkResult<T> = Result<T, BookmarkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_store_message() {
        let err = BookmarkError::Transport(Some("Database offline".to_string()));
        assert_eq!(err.user_message("Error adding bookmark"), "Database offline");
    }

    #[test]
    fn test_user_message_falls_back_without_store_message() {
        let err = BookmarkError::Transport(None);
        assert_eq!(err.user_message("Error adding bookmark"), "Error adding bookmark");

        let blank = BookmarkError::Validation("  ".to_string());
        assert_eq!(blank.user_message("Error adding bookmark"), "Error adding bookmark");
    }

    #[test]
    fn test_transport_display() {
        assert_eq!(
            BookmarkError::Transport(None).to_string(),
            "Bookmark store unavailable"
        );
        assert_eq!(
            BookmarkError::Transport(Some("timeout".to_string())).to_string(),
            "Bookmark store unavailable: timeout"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(BookmarkError::AuthRequired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            BookmarkError::Conflict("dup".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            BookmarkError::NotFound("gone".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
