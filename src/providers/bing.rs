//! Bing Web Search provider (keyed JSON REST)
//!
//! Credential travels as an `Ocp-Apim-Subscription-Key` header; the abstract
//! category selects the endpoint path under the v7.0 API. Also implements the
//! optional suggestion capability via the Suggestions endpoint.

use crate::error::{SearchApiResult, SearchError};
use crate::types::{Category, SearchOptions, SearchProvider, SearchResult};
use crate::utils::http::{self, HttpClient};
use chrono::Utc;
use serde::Deserialize;
use std::collections::HashMap;

const DEFAULT_ENDPOINT: &str = "https://api.bing.microsoft.com/v7.0";
const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
struct BingResponse {
    /// Present on `search` responses
    #[serde(rename = "webPages", default)]
    web_pages: Option<BingWebPages>,
    /// Present on `images/search`, `news/search`, and `videos/search`
    #[serde(default)]
    value: Option<Vec<BingMediaItem>>,
}

#[derive(Debug, Deserialize)]
struct BingWebPages {
    #[serde(default)]
    value: Vec<BingWebPage>,
}

#[derive(Debug, Deserialize)]
struct BingWebPage {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BingMediaItem {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(rename = "contentUrl", default)]
    content_url: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "thumbnailUrl", default)]
    thumbnail_url: Option<String>,
    #[serde(default)]
    image: Option<BingImageRef>,
    #[serde(default)]
    provider: Option<Vec<BingProviderRef>>,
}

#[derive(Debug, Deserialize)]
struct BingImageRef {
    #[serde(default)]
    thumbnail: Option<BingThumbnailRef>,
}

#[derive(Debug, Deserialize)]
struct BingThumbnailRef {
    #[serde(rename = "contentUrl", default)]
    content_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BingProviderRef {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BingSuggestionsResponse {
    #[serde(rename = "suggestionGroups", default)]
    suggestion_groups: Vec<BingSuggestionGroup>,
}

#[derive(Debug, Deserialize)]
struct BingSuggestionGroup {
    #[serde(rename = "searchSuggestions", default)]
    search_suggestions: Vec<BingSuggestion>,
}

#[derive(Debug, Deserialize)]
struct BingSuggestion {
    #[serde(rename = "displayText", default)]
    display_text: Option<String>,
}

#[derive(Debug)]
pub struct BingProvider {
    api_key: Option<String>,
    endpoint: String,
    http_client: HttpClient,
}

impl BingProvider {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.is_empty()),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            http_client: HttpClient::new(),
        }
    }

    /// Override the endpoint, used by tests against a mock server.
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    fn path_for(category: Category) -> &'static str {
        match category {
            Category::Images => "images/search",
            Category::News => "news/search",
            Category::Videos => "videos/search",
            // Shopping and scholar have no Bing v7.0 vertical
            Category::Web | Category::Shopping | Category::Scholar => "search",
        }
    }

    fn auth_headers(&self, api_key: &str) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert(
            "Ocp-Apim-Subscription-Key".to_string(),
            api_key.to_string(),
        );
        headers
    }

    fn parse_results(
        response: BingResponse,
        category: Category,
        limit: usize,
    ) -> Vec<SearchResult> {
        if let Some(web_pages) = response.web_pages {
            return web_pages
                .value
                .into_iter()
                .take(limit)
                .map(|page| SearchResult {
                    id: 0,
                    query: String::new(),
                    title: page.name.unwrap_or_default(),
                    url: page.url.unwrap_or_default(),
                    description: page.snippet.unwrap_or_default(),
                    category: Category::Web,
                    source: "Bing".to_string(),
                    thumbnail_url: None,
                    tags: Vec::new(),
                    timestamp: Utc::now(),
                })
                .collect();
        }

        let items = response.value.unwrap_or_default();
        items
            .into_iter()
            .take(limit)
            .map(|item| {
                let title = item.name.unwrap_or_default();
                let (url, description, thumbnail_url, source, tags) = match category {
                    Category::Images => (
                        item.content_url.unwrap_or_default(),
                        title.clone(),
                        item.thumbnail_url,
                        "Bing Images".to_string(),
                        Vec::new(),
                    ),
                    Category::News => (
                        item.url.unwrap_or_default(),
                        item.description.unwrap_or_default(),
                        item.image
                            .and_then(|image| image.thumbnail)
                            .and_then(|thumb| thumb.content_url),
                        "Bing News".to_string(),
                        vec![item
                            .provider
                            .and_then(|providers| providers.into_iter().next())
                            .and_then(|provider| provider.name)
                            .unwrap_or_else(|| "News".to_string())],
                    ),
                    _ => (
                        item.content_url.or(item.url).unwrap_or_default(),
                        item.description.unwrap_or_default(),
                        item.thumbnail_url,
                        "Bing".to_string(),
                        Vec::new(),
                    ),
                };

                SearchResult {
                    id: 0,
                    query: String::new(),
                    title,
                    url,
                    description,
                    category,
                    source,
                    thumbnail_url,
                    tags,
                    timestamp: Utc::now(),
                }
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl SearchProvider for BingProvider {
    fn name(&self) -> &str {
        "bing"
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
                "Bing subscription key is not configured".to_string(),
            ));
        };

        let category = options.category.unwrap_or_default();
        let limit = options.limit.unwrap_or(DEFAULT_LIMIT);
        let path = Self::path_for(category);

        let url = http::build_url(
            &format!("{}/{path}", self.endpoint),
            &[("q", query.to_string()), ("count", limit.to_string())],
        )?;

        let response: BingResponse = self
            .http_client
            .get_json_with_headers(&url, &self.auth_headers(api_key))
            .await?;

        Ok(Self::parse_results(response, category, limit))
    }

    fn supports_suggestions(&self) -> bool {
        true
    }

    async fn suggestions(&self, partial: &str) -> SearchApiResult<Vec<String>> {
        let Some(api_key) = &self.api_key else {
            return Err(SearchError::Config(
                "Bing subscription key is not configured".to_string(),
            ));
        };

        let url = http::build_url(
            &format!("{}/Suggestions", self.endpoint),
            &[("q", partial.to_string())],
        )?;

        let response: BingSuggestionsResponse = self
            .http_client
            .get_json_with_headers(&url, &self.auth_headers(api_key))
            .await?;

        let suggestions = response
            .suggestion_groups
            .into_iter()
            .next()
            .map(|group| {
                group
                    .search_suggestions
                    .into_iter()
                    .filter_map(|suggestion| suggestion.display_text)
                    .collect()
            })
            .unwrap_or_default();

        Ok(suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn availability_tracks_key_presence() {
        assert!(!BingProvider::new(None).is_available());
        assert!(BingProvider::new(Some("key".to_string())).is_available());
    }

    #[test]
    fn categories_map_to_endpoint_paths() {
        assert_eq!(BingProvider::path_for(Category::Web), "search");
        assert_eq!(BingProvider::path_for(Category::Images), "images/search");
        assert_eq!(BingProvider::path_for(Category::News), "news/search");
        assert_eq!(BingProvider::path_for(Category::Shopping), "search");
    }

    #[test]
    fn parses_web_results_with_missing_fields() {
        let response: BingResponse = serde_json::from_value(serde_json::json!({
            "webPages": {
                "value": [
                    { "name": "Page", "url": "https://example.com", "snippet": "text" },
                    { "url": "https://example.org" }
                ]
            }
        }))
        .unwrap();

        let results = BingProvider::parse_results(response, Category::Web, 10);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Page");
        assert_eq!(results[1].title, "");
        assert_eq!(results[1].url, "https://example.org");
    }

    #[test]
    fn parses_news_results_with_provider_tag() {
        let response: BingResponse = serde_json::from_value(serde_json::json!({
            "value": [
                {
                    "name": "Headline",
                    "url": "https://news.example.com/a",
                    "description": "Body",
                    "image": { "thumbnail": { "contentUrl": "https://img.example.com/t.jpg" } },
                    "provider": [{ "name": "Example News" }]
                }
            ]
        }))
        .unwrap();

        let results = BingProvider::parse_results(response, Category::News, 10);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source, "Bing News");
        assert_eq!(results[0].tags, vec!["Example News".to_string()]);
        assert_eq!(
            results[0].thumbnail_url.as_deref(),
            Some("https://img.example.com/t.jpg")
        );
    }

    #[tokio::test]
    async fn suggestions_without_key_is_a_config_error() {
        let provider = BingProvider::new(None);
        let err = provider.suggestions("ru").await.unwrap_err();
        assert!(matches!(err, SearchError::Config(_)));
    }
}
