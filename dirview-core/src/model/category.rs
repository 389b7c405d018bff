//! Directory records as served by the remote API.

use serde::{Deserialize, Serialize};

/// A named grouping backed by an opaque list identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    /// Opaque identifier passed to `/list/{file}`
    pub file: String,
}

impl Category {
    pub fn new(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
        }
    }

    /// Case-insensitive name comparison used when resolving a location.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Find a category by name, ignoring case.
pub fn find_by_name<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
    categories.iter().find(|c| c.matches_name(name))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub username: String,
    /// Display name of the category the username belongs to
    pub category: String,
}

/// Public profile link for a username.
pub fn profile_url(username: &str) -> String {
    format!("https://x.com/{username}")
}
