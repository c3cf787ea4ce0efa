//! Local datastore backing the in-process provider
//!
//! The store is the aggregation engine's only persistent collaborator: it
//! serves seeded/cached results through a free-text match, records query
//! history, and derives suggestions from that history.

use crate::error::{SearchApiResult, SearchError};
use crate::types::{Category, SearchResult};
use chrono::Utc;
use tokio::sync::RwLock;

/// Maximum suggestions the store returns for one partial query
const MAX_STORE_SUGGESTIONS: usize = 5;

/// Storage collaborator contract for the local provider.
#[async_trait::async_trait]
pub trait SearchStore: Send + Sync + std::fmt::Debug {
    /// Free-text match over query/title/description, optionally filtered to
    /// an exact category.
    async fn search_results(
        &self,
        query: &str,
        category: Option<Category>,
    ) -> SearchApiResult<Vec<SearchResult>>;

    /// Distinct previously-recorded queries containing the partial query.
    async fn suggestions(&self, partial: &str) -> SearchApiResult<Vec<String>>;

    /// Append a query to the search history feeding `suggestions`.
    async fn record_search(&self, query: &str) -> SearchApiResult<()>;
}

/// In-memory store seeded with a demo corpus.
#[derive(Debug, Default)]
pub struct MemoryStore {
    results: Vec<SearchResult>,
    history: RwLock<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with demo rows and a few popular queries.
    pub fn with_demo_data() -> Self {
        Self {
            results: demo_results(),
            history: RwLock::new(vec![
                "artificial intelligence".to_string(),
                "machine learning".to_string(),
                "rust programming".to_string(),
            ]),
        }
    }

    /// Store holding exactly the given rows, for tests and embedding.
    pub fn with_results(results: Vec<SearchResult>) -> Self {
        Self {
            results,
            history: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl SearchStore for MemoryStore {
    async fn search_results(
        &self,
        query: &str,
        category: Option<Category>,
    ) -> SearchApiResult<Vec<SearchResult>> {
        let needle = query.to_lowercase();

        let matches = self
            .results
            .iter()
            .filter(|entry| {
                let text_match = entry.query.to_lowercase().contains(&needle)
                    || entry.title.to_lowercase().contains(&needle)
                    || entry.description.to_lowercase().contains(&needle);
                match category {
                    Some(category) => text_match && entry.category == category,
                    None => text_match,
                }
            })
            .cloned()
            .collect();

        Ok(matches)
    }

    async fn suggestions(&self, partial: &str) -> SearchApiResult<Vec<String>> {
        if partial.is_empty() {
            return Ok(Vec::new());
        }
        let needle = partial.to_lowercase();
        let history = self.history.read().await;

        let mut seen = Vec::new();
        for query in history.iter() {
            if query.to_lowercase().contains(&needle) && !seen.contains(query) {
                seen.push(query.clone());
                if seen.len() >= MAX_STORE_SUGGESTIONS {
                    break;
                }
            }
        }
        Ok(seen)
    }

    async fn record_search(&self, query: &str) -> SearchApiResult<()> {
        if query.trim().is_empty() {
            return Err(SearchError::InvalidInput(
                "cannot record an empty query".to_string(),
            ));
        }
        self.history.write().await.push(query.to_string());
        Ok(())
    }
}

fn demo_row(query: &str, title: &str, description: &str, url: &str, tags: &[&str]) -> SearchResult {
    SearchResult {
        id: 0,
        query: query.to_string(),
        title: title.to_string(),
        url: url.to_string(),
        description: description.to_string(),
        category: Category::Web,
        source: crate::utils::http::extract_domain(url).unwrap_or_default(),
        thumbnail_url: None,
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
        timestamp: Utc::now(),
    }
}

fn demo_results() -> Vec<SearchResult> {
    vec![
        demo_row(
            "artificial intelligence",
            "Understanding Artificial Intelligence: A Comprehensive Guide",
            "Explore the fundamentals of artificial intelligence, from basic algorithms to advanced neural networks, with a look at current applications and future potential.",
            "https://artificial-intelligence.research.com/guide",
            &["research", "machine learning"],
        ),
        demo_row(
            "artificial intelligence",
            "Recent Breakthroughs in Neural Network Architecture",
            "A detailed analysis of recent innovations in neural network design that have led to significant improvements in AI performance across domains.",
            "https://tech.university.edu/neural-networks",
            &["technical", "academic"],
        ),
        demo_row(
            "artificial intelligence",
            "Ethical Considerations in Artificial Intelligence Development",
            "Examining the ethical implications of artificial intelligence systems, including bias, privacy, transparency, and accountability.",
            "https://ai-ethics-institute.org/considerations",
            &["ethics", "social impact"],
        ),
        demo_row(
            "artificial intelligence",
            "The Evolution of AI: From Turing to Transformers",
            "A historical perspective on artificial intelligence, tracing its path from early theoretical concepts to modern deep learning architectures.",
            "https://ai-history.edu/evolution",
            &["academic", "research"],
        ),
        demo_row(
            "artificial intelligence",
            "AI in Healthcare: Revolutionizing Patient Care",
            "How artificial intelligence is transforming healthcare delivery, from diagnostic assistance to personalized treatment planning.",
            "https://medical-ai-journal.org/revolution",
            &["healthcare", "technology"],
        ),
        demo_row(
            "artificial intelligence",
            "Top 10 AI Tools for Developers in 2025",
            "A curated list of the most powerful artificial intelligence tools developers should be using to build next-generation applications.",
            "https://dev-ai-resources.com/top-tools",
            &["tutorial", "technology"],
        ),
        demo_row(
            "machine learning",
            "Machine Learning Fundamentals: Supervised and Unsupervised",
            "An introduction to core machine learning paradigms, covering regression, classification, and clustering with worked examples.",
            "https://ml-course.io/fundamentals",
            &["tutorial", "education"],
        ),
        demo_row(
            "machine learning",
            "Feature Engineering Techniques That Actually Work",
            "Practical feature engineering strategies for tabular machine learning problems, from encoding schemes to leakage pitfalls.",
            "https://data-practice.dev/feature-engineering",
            &["technical"],
        ),
        demo_row(
            "rust programming",
            "The Rust Programming Language Book",
            "The official guide to Rust: ownership, borrowing, lifetimes, and fearless concurrency, with hands-on projects.",
            "https://doc.rust-lang.org/book/",
            &["documentation", "official"],
        ),
        demo_row(
            "rust programming",
            "Async Rust in Practice",
            "Patterns for writing reliable asynchronous Rust services with tokio, including cancellation, timeouts, and structured concurrency.",
            "https://async-rust.dev/in-practice",
            &["technical", "async"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn search_matches_query_title_and_description() {
        let store = MemoryStore::with_demo_data();

        let results = store
            .search_results("artificial intelligence", None)
            .await
            .unwrap();
        assert_eq!(results.len(), 6);

        // "transformers" only appears in one title/description
        let results = store.search_results("transformers", None).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn search_is_case_insensitive() {
        let store = MemoryStore::with_demo_data();
        let results = store.search_results("RUST", None).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn category_filter_is_exact() {
        let store = MemoryStore::with_demo_data();

        let web = store
            .search_results("rust", Some(Category::Web))
            .await
            .unwrap();
        assert_eq!(web.len(), 2);

        let news = store
            .search_results("rust", Some(Category::News))
            .await
            .unwrap();
        assert!(news.is_empty());
    }

    #[tokio::test]
    async fn suggestions_come_from_recorded_history() {
        let store = MemoryStore::new();
        store.record_search("rust async runtime").await.unwrap();
        store.record_search("rust async runtime").await.unwrap();
        store.record_search("rust web framework").await.unwrap();

        let suggestions = store.suggestions("rust").await.unwrap();
        assert_eq!(
            suggestions,
            vec![
                "rust async runtime".to_string(),
                "rust web framework".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn suggestions_empty_for_empty_partial() {
        let store = MemoryStore::with_demo_data();
        assert!(store.suggestions("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn record_search_rejects_blank_queries() {
        let store = MemoryStore::new();
        assert!(store.record_search("   ").await.is_err());
    }
}
