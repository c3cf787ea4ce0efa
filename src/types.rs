//! Core types and the provider trait for the aggregation engine

use crate::error::SearchApiResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Semantic bucket a search result belongs to.
///
/// Each provider maps these onto its own engine or endpoint identifier;
/// anything a provider cannot map falls back to general web search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Web,
    Images,
    News,
    Videos,
    Shopping,
    Scholar,
}

impl Category {
    /// Parse a category label, falling back to [`Category::Web`] for anything
    /// unrecognized.
    pub fn parse(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "images" => Category::Images,
            "news" => Category::News,
            "videos" => Category::Videos,
            "shopping" => Category::Shopping,
            "scholar" => Category::Scholar,
            _ => Category::Web,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Web => write!(f, "web"),
            Category::Images => write!(f, "images"),
            Category::News => write!(f, "news"),
            Category::Videos => write!(f, "videos"),
            Category::Shopping => write!(f, "shopping"),
            Category::Scholar => write!(f, "scholar"),
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Web
    }
}

/// A normalized search result returned by any provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Sequential position in the merged list, re-assigned during merging.
    /// Not stable across repeated calls.
    pub id: u32,
    /// Echo of the originating query; empty for externally-sourced results
    pub query: String,
    /// Title of the result
    pub title: String,
    /// URL of the result; serves as the deduplication key
    pub url: String,
    /// Snippet/description text
    pub description: String,
    /// Semantic bucket the result belongs to
    pub category: Category,
    /// Provenance label (provider display name)
    pub source: String,
    /// Thumbnail image URL, if the provider supplied one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Freeform labels attached by the provider
    #[serde(default)]
    pub tags: Vec<String>,
    /// Creation time; only meaningful as insertion order for external results
    pub timestamp: DateTime<Utc>,
}

impl SearchResult {
    /// Build a result with defaults for the fields external providers rarely
    /// supply.
    pub fn new(title: impl Into<String>, url: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: 0,
            query: String::new(),
            title: title.into(),
            url: url.into(),
            description: String::new(),
            category: Category::Web,
            source: source.into(),
            thumbnail_url: None,
            tags: Vec::new(),
            timestamp: Utc::now(),
        }
    }
}

/// Per-request options shared by all providers.
///
/// Each provider interprets or ignores individual fields; the `extra` bag
/// carries provider-specific extensions without widening the struct.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Category filter hint passed through to providers
    pub category: Option<Category>,
    /// Soft cap on the number of results requested
    pub limit: Option<usize>,
    /// Pagination offset hint; not uniformly honored by all providers
    pub page: Option<u32>,
    /// Open-ended provider-specific options
    pub extra: HashMap<String, serde_json::Value>,
}

impl SearchOptions {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }
}

/// Capability contract every search backend implements.
///
/// Providers are constructed once at startup, hold only configuration, and
/// must be callable concurrently: `search` takes `&self` and no method keeps
/// per-request mutable state.
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync + fmt::Debug {
    /// Display name, used for logging and result provenance
    fn name(&self) -> &str;

    /// Whether the provider can serve requests. A pure function of static
    /// configuration (credential presence), never I/O.
    fn is_available(&self) -> bool;

    /// Run one provider-specific request and parse it into normalized
    /// results, capped at `options.limit` (provider default 10 when absent).
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> SearchApiResult<Vec<SearchResult>>;

    /// Whether this provider implements the optional suggestion capability
    fn supports_suggestions(&self) -> bool {
        false
    }

    /// Short completion strings for a partial query. Providers that do not
    /// support suggestions keep the default empty implementation.
    async fn suggestions(&self, _partial: &str) -> SearchApiResult<Vec<String>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parse_known_labels() {
        assert_eq!(Category::parse("images"), Category::Images);
        assert_eq!(Category::parse("NEWS"), Category::News);
        assert_eq!(Category::parse("scholar"), Category::Scholar);
    }

    #[test]
    fn category_parse_falls_back_to_web() {
        assert_eq!(Category::parse("podcasts"), Category::Web);
        assert_eq!(Category::parse(""), Category::Web);
        assert_eq!(Category::parse("all"), Category::Web);
    }

    #[test]
    fn category_display_round_trips() {
        for category in [
            Category::Web,
            Category::Images,
            Category::News,
            Category::Videos,
            Category::Shopping,
            Category::Scholar,
        ] {
            assert_eq!(Category::parse(&category.to_string()), category);
        }
    }

    #[test]
    fn search_result_serializes_camel_case() {
        let mut result = SearchResult::new("Title", "https://example.com", "Local");
        result.thumbnail_url = Some("https://example.com/t.png".to_string());

        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("thumbnailUrl").is_some());
        assert_eq!(json["category"], "web");
    }
}
