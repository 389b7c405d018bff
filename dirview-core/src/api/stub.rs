//! In-memory `DirectoryApi` for controller tests.

use std::{
    collections::{HashMap, HashSet},
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;

use crate::{
    api::client::DirectoryApi,
    error::AppError,
    model::category::{Category, SearchResult},
};

#[derive(Default)]
pub struct StubApi {
    categories: Vec<Category>,
    categories_status: Option<u16>,
    lists: Mutex<HashMap<String, Vec<String>>>,
    searches: HashMap<String, Vec<SearchResult>>,
    failing_searches: HashSet<String>,
    list_calls: AtomicUsize,
    search_log: Mutex<Vec<String>>,
}

impl StubApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, name: &str, file: &str) -> Self {
        self.categories.push(Category::new(name, file));
        self
    }

    pub fn with_list(self, file: &str, usernames: Vec<String>) -> Self {
        self.set_list(file, usernames);
        self
    }

    pub fn with_search(mut self, query: &str, results: Vec<SearchResult>) -> Self {
        self.searches.insert(query.to_string(), results);
        self
    }

    pub fn failing_categories(mut self, status: u16) -> Self {
        self.categories_status = Some(status);
        self
    }

    pub fn failing_search(mut self, query: &str) -> Self {
        self.failing_searches.insert(query.to_string());
        self
    }

    /// Make a list available (or replace it) after construction.
    pub fn set_list(&self, file: &str, usernames: Vec<String>) {
        self.lists
            .lock()
            .unwrap()
            .insert(file.to_string(), usernames);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn search_queries(&self) -> Vec<String> {
        self.search_log.lock().unwrap().clone()
    }

    pub fn usernames(prefix: &str, count: usize) -> Vec<String> {
        (0..count).map(|i| format!("{prefix}{i}")).collect()
    }

    pub fn results(prefix: &str, count: usize) -> Vec<SearchResult> {
        Self::usernames(prefix, count)
            .into_iter()
            .map(|username| SearchResult {
                username,
                category: "Artists".to_string(),
            })
            .collect()
    }
}

#[async_trait]
impl DirectoryApi for StubApi {
    async fn categories(&self) -> Result<Vec<Category>, AppError> {
        match self.categories_status {
            Some(status) => Err(AppError::status("/categories", status)),
            None => Ok(self.categories.clone()),
        }
    }

    async fn list(&self, file: &str) -> Result<Vec<String>, AppError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.lists
            .lock()
            .unwrap()
            .get(file)
            .cloned()
            .ok_or_else(|| AppError::status(format!("/list/{file}"), 404))
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, AppError> {
        self.search_log.lock().unwrap().push(query.to_string());
        if self.failing_searches.contains(query) {
            return Err(AppError::status("/search", 500));
        }
        Ok(self.searches.get(query).cloned().unwrap_or_default())
    }
}
