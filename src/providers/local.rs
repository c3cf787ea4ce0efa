//! Local datastore-backed provider
//!
//! Always available; serves as the last-resort fallback when the manager's
//! aggregation pipeline fails or no external provider is configured.

use crate::error::SearchApiResult;
use crate::storage::SearchStore;
use crate::types::{SearchOptions, SearchProvider, SearchResult};
use std::sync::Arc;

const DEFAULT_LIMIT: usize = 10;

#[derive(Debug)]
pub struct LocalProvider {
    store: Arc<dyn SearchStore>,
}

impl LocalProvider {
    pub fn new(store: Arc<dyn SearchStore>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl SearchProvider for LocalProvider {
    fn name(&self) -> &str {
        "local"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> SearchApiResult<Vec<SearchResult>> {
        let mut results = self.store.search_results(query, options.category).await?;

        let limit = options.limit.unwrap_or(DEFAULT_LIMIT);
        results.truncate(limit);

        Ok(results)
    }

    fn supports_suggestions(&self) -> bool {
        true
    }

    async fn suggestions(&self, partial: &str) -> SearchApiResult<Vec<String>> {
        self.store.suggestions(partial).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn search_truncates_to_limit() {
        let provider = LocalProvider::new(Arc::new(MemoryStore::with_demo_data()));

        let options = SearchOptions::with_limit(2);
        let results = provider
            .search("artificial intelligence", &options)
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn always_available() {
        let provider = LocalProvider::new(Arc::new(MemoryStore::new()));
        assert!(provider.is_available());
        assert!(provider.supports_suggestions());
    }
}
