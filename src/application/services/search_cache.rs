use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

use crate::domain::{SearchQuery, VideoSummary};

pub const DEFAULT_SEARCH_CACHE_CAPACITY: usize = 256;

/// Memo of search results owned by the running service.
///
/// Only non-empty result sets are kept. Recording an empty result evicts the
/// query, so a transient upstream failure is never served from cache. When
/// full, the oldest query is evicted first.
pub struct SearchCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<SearchQuery, Vec<VideoSummary>>,
    order: VecDeque<SearchQuery>,
}

impl SearchCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(CacheInner::default()),
        }
    }

    pub fn get(&self, query: &SearchQuery) -> Option<Vec<VideoSummary>> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner
            .entries
            .get(query)
            .filter(|results| !results.is_empty())
            .cloned()
    }

    pub fn record(&self, query: &SearchQuery, results: &[VideoSummary]) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

        if results.is_empty() {
            inner.entries.remove(query);
            inner.order.retain(|q| q != query);
            return;
        }

        if inner.entries.contains_key(query) {
            inner.order.retain(|q| q != query);
        } else if inner.entries.len() >= self.capacity
            && let Some(oldest) = inner.order.pop_front()
        {
            inner.entries.remove(&oldest);
        }

        inner.entries.insert(query.clone(), results.to_vec());
        inner.order.push_back(query.clone());
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SearchCache {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_CACHE_CAPACITY)
    }
}
