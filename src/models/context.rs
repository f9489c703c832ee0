use std::fmt::Display;

use super::{BookmarkQuery, UserId};

/// Who is looking, and through which keyword filter
///
/// Passed explicitly into every cache and controller call. Two contexts that
/// compare equal share one bookmark snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct QueryContext {
    pub user: Option<UserId>,
    pub keyword: Option<String>,
}

impl QueryContext {
    pub fn new(user: Option<UserId>, keyword: Option<String>) -> Self {
        Self {
            user,
            keyword: keyword
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_user(user: impl Into<String>) -> Self {
        Self::new(Some(UserId::new(user)), None)
    }

    pub fn with_keyword(self, keyword: impl Into<String>) -> Self {
        Self::new(self.user, Some(keyword.into()))
    }

    pub fn is_anonymous(&self) -> bool {
        self.user.is_none()
    }

    /// Store query for this context, `None` when nobody is logged in
    pub fn query(&self) -> Option<BookmarkQuery> {
        self.user
            .as_ref()
            .map(|user| BookmarkQuery::new(user.clone(), self.keyword.clone()))
    }
}

impl Display for QueryContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let user = self.user.as_ref().map(UserId::as_str).unwrap_or("anonymous");
        write!(f, "bookmarks:{}:{}", user, self.keyword.as_deref().unwrap_or(""))
    }
}
