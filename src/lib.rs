//! # metasearch
//!
//! A multi-provider search aggregation engine. One query fans out
//! concurrently to a local datastore and several external search backends
//! (DuckDuckGo HTML, SerpApi, Bing); the results are merged round-robin with
//! url deduplication into a single list with provenance metadata.
//!
//! Providers are fail-soft: a provider that errors contributes an empty list
//! instead of failing the aggregated search, and the manager itself falls
//! back to the local provider if the whole pipeline breaks. Result ordering
//! is positional fairness, not relevance scoring.
//!
//! ## Quick Start
//!
//! ```no_run
//! use metasearch::{SearchConfig, SearchManager, SearchOptions, storage::MemoryStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = SearchConfig::from_env();
//!     let store = Arc::new(MemoryStore::with_demo_data());
//!     let manager = SearchManager::new(&config, store);
//!
//!     let results = manager
//!         .search("rust async", &SearchOptions::with_limit(10))
//!         .await;
//!
//!     for result in &results {
//!         println!("{}. [{}] {}: {}", result.id, result.source, result.title, result.url);
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod manager;
pub mod providers;
pub mod storage;
pub mod types;
pub mod utils;

// Re-export common types
pub use config::SearchConfig;
pub use error::{SearchApiResult, SearchError};
pub use manager::SearchManager;
pub use types::{Category, SearchOptions, SearchProvider, SearchResult};
