//! SerpApi provider (keyed JSON REST)
//!
//! Credential travels as an `api_key` query parameter; the abstract category
//! maps onto SerpApi's engine identifiers.

use crate::error::{SearchApiResult, SearchError};
use crate::types::{Category, SearchOptions, SearchProvider, SearchResult};
use crate::utils::http::{self, HttpClient};
use chrono::Utc;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://serpapi.com/search.json";
const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    organic_results: Option<Vec<SerpApiOrganicResult>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SerpApiOrganicResult {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    rich_snippet: Option<SerpApiRichSnippet>,
}

#[derive(Debug, Deserialize)]
struct SerpApiRichSnippet {
    #[serde(default)]
    top: Option<SerpApiRichSnippetBlock>,
}

#[derive(Debug, Deserialize)]
struct SerpApiRichSnippetBlock {
    #[serde(default)]
    extensions: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct SerpApiProvider {
    api_key: Option<String>,
    base_url: String,
    http_client: HttpClient,
}

impl SerpApiProvider {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
            http_client: HttpClient::new(),
        }
    }

    /// Override the endpoint, used by tests against a mock server.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    fn engine_for(category: Category) -> &'static str {
        match category {
            Category::Images => "google_images",
            Category::News => "google_news",
            Category::Videos => "youtube",
            Category::Shopping => "google_shopping",
            Category::Scholar => "google_scholar",
            Category::Web => "google",
        }
    }
}

#[async_trait::async_trait]
impl SearchProvider for SerpApiProvider {
    fn name(&self) -> &str {
        "serpapi"
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> SearchApiResult<Vec<SearchResult>> {
        let Some(api_key) = &self.api_key else {
            return Err(SearchError::Config(
                "SerpApi key is not configured".to_string(),
            ));
        };

        let category = options.category.unwrap_or_default();
        let engine = Self::engine_for(category);
        let limit = options.limit.unwrap_or(DEFAULT_LIMIT);

        let mut params = vec![
            ("api_key", api_key.clone()),
            ("q", query.to_string()),
            ("engine", engine.to_string()),
        ];
        if engine == "google" {
            params.push(("gl", "us".to_string()));
            params.push(("hl", "en".to_string()));
            params.push(("num", limit.to_string()));
        }

        let url = http::build_url(&self.base_url, &params)?;
        let response: SerpApiResponse = self.http_client.get_json(&url).await?;

        if let Some(error) = response.error {
            return Err(SearchError::Provider(format!("SerpApi error: {error}")));
        }

        let organic = response.organic_results.unwrap_or_default();
        log::debug!("serpapi ({engine}) returned {} organic results", organic.len());

        let results = organic
            .into_iter()
            .take(limit)
            .map(|item| SearchResult {
                id: 0,
                query: String::new(),
                title: item.title.unwrap_or_default(),
                url: item.link.unwrap_or_default(),
                description: item.snippet.unwrap_or_default(),
                category,
                source: "SerpApi".to_string(),
                thumbnail_url: item.thumbnail,
                tags: item
                    .rich_snippet
                    .and_then(|rich| rich.top)
                    .and_then(|top| top.extensions)
                    .unwrap_or_default(),
                timestamp: Utc::now(),
            })
            .collect();

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn availability_tracks_key_presence() {
        assert!(!SerpApiProvider::new(None).is_available());
        assert!(!SerpApiProvider::new(Some(String::new())).is_available());
        assert!(SerpApiProvider::new(Some("key".to_string())).is_available());
    }

    #[test]
    fn categories_map_to_engines() {
        assert_eq!(SerpApiProvider::engine_for(Category::Web), "google");
        assert_eq!(SerpApiProvider::engine_for(Category::Images), "google_images");
        assert_eq!(SerpApiProvider::engine_for(Category::Videos), "youtube");
        assert_eq!(SerpApiProvider::engine_for(Category::Scholar), "google_scholar");
    }

    #[tokio::test]
    async fn search_without_key_is_a_config_error() {
        let provider = SerpApiProvider::new(None);
        let err = provider
            .search("rust", &SearchOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Config(_)));
    }
}
