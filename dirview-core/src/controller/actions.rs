//! src/controller/actions.rs
//! ============================================================================
//! # Actions: user intents and background completions
//!
//! `Action` is what a key press turns into; `TaskResult` is what a spawned
//! fetch or timer sends back. The controller consumes both, one at a time.

use std::time::Duration;

use crate::{
    error::AppError,
    model::category::{Category, SearchResult},
};

/// Represents a high-level action that the application can perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,

    /// Give keyboard focus to the search input.
    FocusSearch,

    /// Return focus to the result area, keeping the input text.
    BlurSearch,

    /// Type a character into the search input.
    SearchInsert(char),

    /// Delete the character before the cursor in the search input.
    SearchBackspace,

    /// Clear the active search (Esc / clear button).
    ClearSearch,

    NextTab,

    PrevTab,

    /// Select the category under the tab cursor.
    SelectTab,

    /// Select a category by position in the tab strip.
    SelectCategoryAt(usize),

    NextPage,

    PrevPage,

    MoveCursorUp,

    MoveCursorDown,

    /// Copy the username under the row cursor.
    CopySelected,

    /// Copy every username in the current category or search.
    CopyAll,

    /// Open the profile of the username under the row cursor.
    OpenSelected,

    ToggleTheme,

    HistoryBack,

    HistoryForward,

    /// Dismiss the current notification early.
    DismissNotification,

    /// Terminal was resized.
    Resize(u16, u16),

    /// No operation. Used when an event is consumed but no state change is needed.
    NoOp,
}

/// Completion messages from spawned tasks.
#[derive(Debug)]
pub enum TaskResult {
    CategoriesLoaded {
        result: Result<Vec<Category>, AppError>,
        took: Duration,
    },

    ListLoaded {
        category: Category,
        result: Result<Vec<String>, AppError>,
        took: Duration,
    },

    SearchCompleted {
        /// Sequence number of the dispatched request
        seq: u64,
        query: String,
        result: Result<Vec<SearchResult>, AppError>,
    },

    /// The search input has been quiet for the debounce interval.
    SearchInputSettled { generation: u64 },
}

impl TaskResult {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CategoriesLoaded { .. } => "categories_loaded",
            Self::ListLoaded { .. } => "list_loaded",
            Self::SearchCompleted { .. } => "search_completed",
            Self::SearchInputSettled { .. } => "search_input_settled",
        }
    }
}

/// Side effects the controller asks its host to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    /// Open a link in the user's browser.
    OpenUrl(String),
}
