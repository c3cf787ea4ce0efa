//! Error types for the search aggregation engine

use thiserror::Error;

/// Result type alias for search operations
pub type SearchApiResult<T> = std::result::Result<T, SearchError>;

/// Errors produced by providers and the storage layer.
///
/// None of these cross the [`SearchManager`](crate::manager::SearchManager)
/// boundary: the manager absorbs provider failures into empty result lists.
#[derive(Error, Debug, Clone)]
pub enum SearchError {
    /// HTTP request failed
    #[error("HTTP request failed: {message}")]
    Http {
        message: String,
        status_code: Option<u16>,
        response_body: Option<String>,
    },

    /// Invalid input parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Provider-specific error (API error payload, unexpected shape)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Parsing error (JSON or HTML)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// Request timed out
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Storage layer failure (local datastore)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Generic error for unhandled cases
    #[error("Search error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            SearchError::Timeout {
                timeout_ms: crate::utils::http::DEFAULT_TIMEOUT_MS,
            }
        } else if error.is_status() {
            let status_code = error.status().map(|s| s.as_u16());
            let message = error.to_string();

            match status_code {
                Some(401 | 403) => SearchError::Authentication(message),
                Some(429) => SearchError::RateLimit(message),
                _ => SearchError::Http {
                    message,
                    status_code,
                    response_body: None,
                },
            }
        } else {
            SearchError::Http {
                message: error.to_string(),
                status_code: None,
                response_body: None,
            }
        }
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(error: serde_json::Error) -> Self {
        SearchError::Parse(format!("JSON parsing failed: {error}"))
    }
}

impl From<url::ParseError> for SearchError {
    fn from(error: url::ParseError) -> Self {
        SearchError::InvalidInput(format!("Invalid URL: {error}"))
    }
}
