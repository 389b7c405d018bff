//! Navigation location (`?category=` / `?search=`) and its history stack.
//!
//! A `Location` is the query-string half of a shareable URL. At most one of
//! the two parameters is ever present; `search` wins when both are supplied.

use std::fmt;

use url::form_urlencoded;

const SEARCH_PARAM: &str = "search";
const CATEGORY_PARAM: &str = "category";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Location {
    /// No parameters: the welcome view.
    #[default]
    Root,
    /// Category name as the user typed or selected it.
    Category(String),
    /// Trimmed query text.
    Search(String),
}

impl Location {
    /// Parse a query string, with or without the leading `?`. Unknown
    /// parameters are ignored; values are trimmed and blank ones count as
    /// absent.
    pub fn parse(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');

        let mut category = None;
        let mut search = None;
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                SEARCH_PARAM if search.is_none() => search = Some(value.to_string()),
                CATEGORY_PARAM if category.is_none() => category = Some(value.to_string()),
                _ => {}
            }
        }

        match (search, category) {
            (Some(query), _) => Self::Search(query),
            (None, Some(name)) => Self::Category(name),
            (None, None) => Self::Root,
        }
    }

    /// Render as a query string; `Root` renders as an empty string.
    pub fn to_query(&self) -> String {
        let (key, value) = match self {
            Self::Root => return String::new(),
            Self::Category(name) => (CATEGORY_PARAM, name),
            Self::Search(query) => (SEARCH_PARAM, query),
        };

        let encoded = form_urlencoded::Serializer::new(String::new())
            .append_pair(key, value)
            .finish();
        format!("?{encoded}")
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("/"),
            other => write!(f, "/{}", other.to_query()),
        }
    }
}

/// Back/forward stack of visited locations.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Location>,
    cursor: usize,
    max_entries: usize,
}

impl History {
    pub const DEFAULT_MAX_ENTRIES: usize = 256;

    pub fn new(initial: Location) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
            max_entries: Self::DEFAULT_MAX_ENTRIES,
        }
    }

    pub fn current(&self) -> &Location {
        &self.entries[self.cursor]
    }

    /// Record a new entry; anything ahead of the cursor is discarded.
    pub fn push(&mut self, location: Location) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(location);
        if self.entries.len() > self.max_entries {
            self.entries.remove(0);
        }
        self.cursor = self.entries.len() - 1;
    }

    pub fn back(&mut self) -> Option<&Location> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.entries[self.cursor])
    }

    pub fn forward(&mut self) -> Option<&Location> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.entries[self.cursor])
    }

    /// Entry `back` would move to, without moving.
    pub fn peek_back(&self) -> Option<&Location> {
        self.cursor.checked_sub(1).map(|idx| &self.entries[idx])
    }

    pub fn peek_forward(&self) -> Option<&Location> {
        self.entries.get(self.cursor + 1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Location::Root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefers_search() {
        assert_eq!(
            Location::parse("?category=Foo&search=abc"),
            Location::Search("abc".into())
        );
        assert_eq!(Location::parse("category=Foo"), Location::Category("Foo".into()));
        assert_eq!(Location::parse(""), Location::Root);
        assert_eq!(Location::parse("?search=&category=x"), Location::Category("x".into()));
        assert_eq!(Location::parse("?page=3"), Location::Root);
    }

    #[test]
    fn test_parse_treats_blank_values_as_absent() {
        assert_eq!(Location::parse("?search=%20"), Location::Root);
        assert_eq!(Location::parse("?search=+&category=Foo"), Location::Category("Foo".into()));
        assert_eq!(Location::parse("?search=%20bob%20"), Location::Search("bob".into()));
    }

    #[test]
    fn test_peek_does_not_move_cursor() {
        let mut history = History::default();
        history.push(Location::Category("Artists".into()));

        assert_eq!(history.peek_back(), Some(&Location::Root));
        assert_eq!(history.peek_forward(), None);
        assert_eq!(history.current(), &Location::Category("Artists".into()));

        history.back();
        assert_eq!(history.peek_forward(), Some(&Location::Category("Artists".into())));
        assert_eq!(history.current(), &Location::Root);
    }

    #[test]
    fn test_query_is_escaped() {
        let loc = Location::Search("a&b c".into());
        assert_eq!(loc.to_query(), "?search=a%26b+c");
        assert_eq!(Location::parse(&loc.to_query()), loc);
        assert_eq!(Location::Root.to_query(), "");
    }

    #[test]
    fn test_history_back_forward() {
        let mut history = History::default();
        history.push(Location::Category("Artists".into()));
        history.push(Location::Search("bob".into()));

        assert_eq!(history.back(), Some(&Location::Category("Artists".into())));
        assert_eq!(history.back(), Some(&Location::Root));
        assert_eq!(history.back(), None);
        assert_eq!(history.forward(), Some(&Location::Category("Artists".into())));

        history.push(Location::Search("carol".into()));
        assert_eq!(history.forward(), None);
        assert_eq!(history.len(), 3);
        assert_eq!(history.current(), &Location::Search("carol".into()));
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = History::default();
        for i in 0..(History::DEFAULT_MAX_ENTRIES + 10) {
            history.push(Location::Search(i.to_string()));
        }
        assert_eq!(history.len(), History::DEFAULT_MAX_ENTRIES);
        assert_eq!(
            history.current(),
            &Location::Search((History::DEFAULT_MAX_ENTRIES + 9).to_string())
        );
    }
}
