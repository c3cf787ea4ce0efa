//! Credential configuration for the external providers
//!
//! Provider availability is derived solely from these values: a provider
//! with a missing credential is skipped by the manager rather than failing
//! at request time.

use std::env;

/// Static credentials read once at startup.
#[derive(Debug, Clone, Default)]
pub struct SearchConfig {
    /// SerpApi API key (`SERPAPI_API_KEY`)
    pub serpapi_api_key: Option<String>,
    /// Bing Web Search subscription key (`BING_SEARCH_API_KEY`)
    pub bing_api_key: Option<String>,
}

impl SearchConfig {
    /// Read credentials from the environment. Empty values are treated as
    /// unset so a blank variable does not mark a provider available.
    pub fn from_env() -> Self {
        Self {
            serpapi_api_key: env_opt("SERPAPI_API_KEY"),
            bing_api_key: env_opt("BING_SEARCH_API_KEY"),
        }
    }
}

fn env_opt(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}
