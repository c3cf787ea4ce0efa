//! HTTP utilities shared by the external search providers

use crate::error::{SearchApiResult, SearchError};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// Default per-request timeout, bounding the worst-case latency a single
/// slow provider can add to an aggregated search.
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// Thin wrapper over [`reqwest::Client`] with the request shapes the
/// providers need: JSON GET with optional headers and raw text GET for the
/// HTML-scraping provider.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT_MS)
    }

    pub fn with_timeout(timeout_ms: u64) -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("metasearch/", env!("CARGO_PKG_VERSION")))
                .build()
                .expect("failed to build HTTP client"),
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    /// GET a URL and deserialize the JSON response body.
    pub async fn get_json<T>(&self, url: &str) -> SearchApiResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self.client.get(url).timeout(self.timeout).send().await?;
        self.json_body(response).await
    }

    /// GET a URL with extra headers and deserialize the JSON response body.
    pub async fn get_json_with_headers<T>(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> SearchApiResult<T>
    where
        T: DeserializeOwned,
    {
        let mut request = self.client.get(url).timeout(self.timeout);
        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request.send().await?;
        self.json_body(response).await
    }

    /// GET a URL with extra headers and return the raw response text.
    pub async fn get_text_with_headers(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> SearchApiResult<String> {
        let mut request = self.client.get(url).timeout(self.timeout);
        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request.send().await?;
        self.text_body(response).await
    }

    async fn json_body<T>(&self, response: Response) -> SearchApiResult<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if status.is_success() {
            Ok(response.json::<T>().await?)
        } else {
            Err(SearchError::Http {
                message: format!("request failed with status {status}"),
                status_code: Some(status.as_u16()),
                response_body: response.text().await.ok(),
            })
        }
    }

    async fn text_body(&self, response: Response) -> SearchApiResult<String> {
        let status = response.status();
        if status.is_success() {
            Ok(response.text().await?)
        } else {
            Err(SearchError::Http {
                message: format!("request failed with status {status}"),
                status_code: Some(status.as_u16()),
                response_body: response.text().await.ok(),
            })
        }
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a URL from a base and query parameters, percent-encoding values.
pub fn build_url(base_url: &str, params: &[(&str, String)]) -> SearchApiResult<String> {
    let mut url = Url::parse(base_url)?;
    for (key, value) in params {
        url.query_pairs_mut().append_pair(key, value);
    }
    Ok(url.to_string())
}

/// Extract the host portion of a URL, if it parses.
pub fn extract_domain(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(|host| host.to_string()))
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Ensure a URL carries a scheme; scraped hrefs are often scheme-relative.
pub fn normalize_url(url: &str) -> String {
    if url.starts_with("//") {
        format!("https:{url}")
    } else if !url.starts_with("http://") && !url.starts_with("https://") {
        format!("https://{url}")
    } else {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_encodes_params() {
        let url = build_url(
            "https://api.example.com/search",
            &[("q", "rust async".to_string()), ("count", "5".to_string())],
        )
        .unwrap();
        assert!(url.contains("q=rust+async"));
        assert!(url.contains("count=5"));
    }

    #[test]
    fn extract_domain_handles_bad_input() {
        assert_eq!(
            extract_domain("https://docs.rs/tokio"),
            Some("docs.rs".to_string())
        );
        assert_eq!(extract_domain("not a url"), None);
    }

    #[test]
    fn normalize_url_adds_scheme() {
        assert_eq!(normalize_url("//example.com/a"), "https://example.com/a");
        assert_eq!(normalize_url("example.com"), "https://example.com");
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
    }

    #[test]
    fn normalize_text_collapses_whitespace() {
        assert_eq!(normalize_text("  a \n b\t c "), "a b c");
    }
}
