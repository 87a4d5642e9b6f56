use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{ProviderError, VideoSearcher};
use crate::domain::{SearchQuery, VideoSummary};

use super::SearchCache;

pub struct SearchService {
    searcher: Arc<dyn VideoSearcher>,
    cache: SearchCache,
    timeout: Duration,
}

impl SearchService {
    pub fn new(searcher: Arc<dyn VideoSearcher>, cache: SearchCache, timeout: Duration) -> Self {
        Self {
            searcher,
            cache,
            timeout,
        }
    }

    pub fn cache(&self) -> &SearchCache {
        &self.cache
    }

    /// Upstream failures degrade to an empty result list, which also clears
    /// any cached entry for the query.
    #[tracing::instrument(skip(self), fields(query = %query))]
    pub async fn search(&self, query: &SearchQuery) -> Vec<VideoSummary> {
        if let Some(hit) = self.cache.get(query) {
            tracing::info!("Search cache hit");
            return hit;
        }

        let results = match tokio::time::timeout(self.timeout, self.searcher.search(query)).await {
            Ok(Ok(results)) => results,
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Search failed");
                Vec::new()
            }
            Err(_) => {
                let e = ProviderError::Timeout(format!(
                    "search exceeded {}s",
                    self.timeout.as_secs()
                ));
                tracing::error!(error = %e, "Search failed");
                Vec::new()
            }
        };

        if results.is_empty() {
            tracing::warn!("Search returned no results");
        } else {
            tracing::info!(results = results.len(), "Search succeeded");
        }
        self.cache.record(query, &results);
        results
    }
}
