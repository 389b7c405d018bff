//! `src/cache/list_cache.rs`
//! ============================================================================
//! # Per-category username cache
//!
//! Lists are fetched at most once per file identifier and kept for the whole
//! session: no TTL, no eviction, no refresh. A failed fetch leaves no entry so
//! the next selection retries.

use std::{collections::HashMap, sync::Arc, time::Duration};

use tracing::debug;

/// Shared, immutable username list.
pub type UsernameList = Arc<[String]>;

#[derive(Debug, Default, Clone, Copy)]
pub struct ListCacheStats {
    hits: u64,
    misses: u64,
    loads: u64,
    load_failures: u64,
    total_load_time: Duration,
}

impl ListCacheStats {
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_load(&mut self, duration: Duration, success: bool) {
        self.loads += 1;
        self.total_load_time += duration;
        if !success {
            self.load_failures += 1;
        }
    }

    pub const fn hits(&self) -> u64 {
        self.hits
    }

    pub const fn misses(&self) -> u64 {
        self.misses
    }

    pub const fn loads(&self) -> u64 {
        self.loads
    }

    pub const fn load_failures(&self) -> u64 {
        self.load_failures
    }

    #[expect(clippy::cast_precision_loss, reason = "Expected precision loss")]
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    #[must_use]
    pub fn average_load_time(&self) -> Duration {
        match u32::try_from(self.loads) {
            Ok(0) | Err(_) => Duration::ZERO,
            Ok(n) => self.total_load_time / n,
        }
    }
}

#[derive(Debug, Default)]
pub struct ListCache {
    lists: HashMap<String, UsernameList>,
    stats: ListCacheStats,
}

impl ListCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lookup that counts towards hit/miss statistics.
    pub fn lookup(&mut self, file: &str) -> Option<UsernameList> {
        match self.lists.get(file) {
            Some(list) => {
                self.stats.record_hit();
                debug!(file, "List cache hit");
                Some(Arc::clone(list))
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Lookup for rendering; does not touch statistics.
    pub fn peek(&self, file: &str) -> Option<&UsernameList> {
        self.lists.get(file)
    }

    pub fn contains(&self, file: &str) -> bool {
        self.lists.contains_key(file)
    }

    /// Store a freshly fetched list. The first successful load for a file
    /// wins; later inserts for the same file are ignored.
    pub fn insert(&mut self, file: impl Into<String>, usernames: Vec<String>, took: Duration) {
        self.stats.record_load(took, true);
        self.lists
            .entry(file.into())
            .or_insert_with(|| Arc::from(usernames));
    }

    pub fn record_failure(&mut self, took: Duration) {
        self.stats.record_load(took, false);
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub fn stats(&self) -> ListCacheStats {
        self.stats
    }
}
