//! Search provider implementations

pub mod bing;
pub mod duckduckgo;
pub mod local;
pub mod serpapi;

// Re-export providers for convenience
pub use bing::BingProvider;
pub use duckduckgo::DuckDuckGoProvider;
pub use local::LocalProvider;
pub use serpapi::SerpApiProvider;
