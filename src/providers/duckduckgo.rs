//! DuckDuckGo provider (HTML scraping)
//!
//! DuckDuckGo has no public JSON search API; this provider fetches the HTML
//! endpoint with a browser-like user agent and extracts result blocks with
//! CSS selectors. No credential required, so it is always available.

use crate::error::{SearchApiResult, SearchError};
use crate::types::{Category, SearchOptions, SearchProvider, SearchResult};
use crate::utils::http::{self, HttpClient};
use chrono::Utc;
use scraper::{Html, Selector};
use std::collections::HashMap;

const DEFAULT_BASE_URL: &str = "https://html.duckduckgo.com/html/";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const DEFAULT_LIMIT: usize = 10;

#[derive(Debug)]
pub struct DuckDuckGoProvider {
    base_url: String,
    http_client: HttpClient,
}

impl DuckDuckGoProvider {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            http_client: HttpClient::new(),
        }
    }

    /// Override the endpoint, used by tests against a mock server.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    fn parse_results(&self, html: &str, limit: usize) -> SearchApiResult<Vec<SearchResult>> {
        let document = Html::parse_document(html);

        let link_selector = Selector::parse("h2.result__title a")
            .map_err(|_| SearchError::Parse("invalid CSS selector for result links".to_string()))?;
        let snippet_selector = Selector::parse(".result__snippet").map_err(|_| {
            SearchError::Parse("invalid CSS selector for result snippets".to_string())
        })?;

        let links: Vec<_> = document.select(&link_selector).collect();
        let snippets: Vec<_> = document.select(&snippet_selector).collect();

        let mut results = Vec::new();
        for (i, link) in links.iter().enumerate() {
            if results.len() >= limit {
                break;
            }

            let Some(href) = link.value().attr("href") else {
                continue;
            };
            // Skip DuckDuckGo-internal navigation links
            if href.contains("duckduckgo.com") {
                continue;
            }

            let url = http::normalize_url(href);
            let title = http::normalize_text(&link.text().collect::<String>());
            let description = snippets
                .get(i)
                .map(|snippet| http::normalize_text(&snippet.text().collect::<String>()))
                .unwrap_or_default();

            results.push(SearchResult {
                id: 0,
                query: String::new(),
                title,
                url,
                description,
                category: Category::Web,
                source: "DuckDuckGo".to_string(),
                thumbnail_url: None,
                tags: Vec::new(),
                timestamp: Utc::now(),
            });
        }

        Ok(results)
    }
}

impl Default for DuckDuckGoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SearchProvider for DuckDuckGoProvider {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> SearchApiResult<Vec<SearchResult>> {
        // The HTML endpoint only serves general web results; category hints
        // other than web are ignored rather than rejected.
        let url = http::build_url(&self.base_url, &[("q", query.to_string())])?;

        let mut headers = HashMap::new();
        headers.insert("User-Agent".to_string(), BROWSER_USER_AGENT.to_string());
        headers.insert(
            "Referer".to_string(),
            "https://html.duckduckgo.com/".to_string(),
        );

        let html = self
            .http_client
            .get_text_with_headers(&url, &headers)
            .await?;
        log::debug!("duckduckgo returned {} bytes of HTML", html.len());

        self.parse_results(&html, options.limit.unwrap_or(DEFAULT_LIMIT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <html><body>
          <div class="result">
            <h2 class="result__title"><a href="https://example.com/one">First <b>Result</b></a></h2>
            <a class="result__snippet">Snippet   with <b>markup</b> inside</a>
          </div>
          <div class="result">
            <h2 class="result__title"><a href="//example.org/two">Second Result</a></h2>
            <a class="result__snippet">Another snippet</a>
          </div>
          <div class="result">
            <h2 class="result__title"><a href="https://duckduckgo.com/settings">Settings</a></h2>
            <a class="result__snippet">Internal link</a>
          </div>
        </body></html>
    "#;

    #[test]
    fn parses_result_blocks_and_strips_markup() {
        let provider = DuckDuckGoProvider::new();
        let results = provider.parse_results(SAMPLE_HTML, 10).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "First Result");
        assert_eq!(results[0].url, "https://example.com/one");
        assert_eq!(results[0].description, "Snippet with markup inside");
        assert_eq!(results[0].source, "DuckDuckGo");

        // Scheme-relative href gets a scheme
        assert_eq!(results[1].url, "https://example.org/two");
    }

    #[test]
    fn respects_limit() {
        let provider = DuckDuckGoProvider::new();
        let results = provider.parse_results(SAMPLE_HTML, 1).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn empty_document_yields_no_results() {
        let provider = DuckDuckGoProvider::new();
        let results = provider.parse_results("<html></html>", 10).unwrap();
        assert!(results.is_empty());
    }
}
