//! Presentation-agnostic description of one frame.
//!
//! The controller derives a `ViewModel` from its state; renderers only read
//! it. Nothing in here knows about terminals.

use std::ops::Range;

use crate::model::{notification::Notification, theme_mode::ThemeMode};

#[derive(Debug, Clone)]
pub struct ViewModel {
    pub theme: ThemeMode,
    /// Current location rendered as a path + query, e.g. `/?category=Artists`
    pub location: String,
    pub tabs: Vec<TabView>,
    pub search: SearchBoxView,
    pub body: Body,
    /// Absent when everything fits on one page.
    pub pagination: Option<PaginationView>,
    pub notification: Option<Notification>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabView {
    pub name: String,
    /// The category currently shown
    pub active: bool,
    /// Under the keyboard tab cursor
    pub focused: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBoxView {
    pub text: String,
    pub focused: bool,
    pub clear_visible: bool,
    pub searching: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Loading {
        label: &'static str,
    },
    Welcome {
        category_count: usize,
    },
    Usernames {
        title: String,
        count_label: String,
        cards: Vec<UserCard>,
        cursor: usize,
    },
    SearchResults {
        count_label: String,
        cards: Vec<SearchCard>,
        cursor: usize,
    },
    Empty {
        title: String,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCard {
    pub username: String,
    pub profile_url: String,
}

impl UserCard {
    pub fn handle(&self) -> String {
        format!("@{}", self.username)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCard {
    pub username: String,
    pub category: String,
    pub profile_url: String,
    /// Byte ranges of the query inside `username`
    pub highlights: Vec<Range<usize>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    pub page: usize,
    pub total_pages: usize,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

impl PaginationView {
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.page, self.total_pages)
    }
}

/// Case-insensitive, non-overlapping occurrences of `query` in `text`.
pub fn match_ranges(text: &str, query: &str) -> Vec<Range<usize>> {
    let needle: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return Vec::new();
    }

    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut ranges = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let mut matched = 0;
        let mut end = start;

        'scan: while end < chars.len() && matched < needle.len() {
            for lower in chars[end].1.to_lowercase() {
                if matched < needle.len() && needle[matched] == lower {
                    matched += 1;
                } else {
                    break 'scan;
                }
            }
            end += 1;
        }

        if matched == needle.len() {
            let end_byte = chars.get(end).map_or(text.len(), |(i, _)| *i);
            ranges.push(chars[start].0..end_byte);
            start = end;
        } else {
            start += 1;
        }
    }

    ranges
}
