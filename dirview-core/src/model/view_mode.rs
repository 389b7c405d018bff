//! The single active view of the browser.

use crate::model::{category::Category, category::SearchResult, pager::Pager};

/// Exactly one mode is active at any time. Transitions replace the whole
/// value, so there is no way to be "half searching".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewMode {
    Loading,
    Welcome,
    Category {
        category: Category,
        pager: Pager,
    },
    Search {
        query: String,
        results: Vec<SearchResult>,
        pager: Pager,
    },
    Empty {
        title: String,
        message: String,
    },
}

impl ViewMode {
    pub fn empty(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Empty {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading",
            Self::Welcome => "Welcome",
            Self::Category { .. } => "Category",
            Self::Search { .. } => "Search",
            Self::Empty { .. } => "Empty",
        }
    }

    pub fn is_search(&self) -> bool {
        matches!(self, Self::Search { .. })
    }

    pub fn pager(&self) -> Option<&Pager> {
        match self {
            Self::Category { pager, .. } | Self::Search { pager, .. } => Some(pager),
            _ => None,
        }
    }

    pub fn pager_mut(&mut self) -> Option<&mut Pager> {
        match self {
            Self::Category { pager, .. } | Self::Search { pager, .. } => Some(pager),
            _ => None,
        }
    }
}

/// Fixed user-facing messages. Technical details only go to the log.
pub mod messages {
    pub const RETRY_LATER: &str = "Please try again later";

    pub const CATEGORIES_FAILED: &str = "Failed to load categories";
    pub const CATEGORY_FAILED: &str = "Failed to load category";
    pub const SEARCH_FAILED: &str = "Search failed";

    pub const EMPTY_CATEGORY_TITLE: &str = "No usernames in this category";
    pub const EMPTY_CATEGORY_MESSAGE: &str = "Check back later for updates";

    pub const NO_MATCHES_TITLE: &str = "No matching usernames found";
    pub const NO_MATCHES_MESSAGE: &str = "Try a different search term";

    pub const COPY_FAILED: &str = "Failed to copy to clipboard";
}
