//! Concurrent fan-out and fair merging across all configured providers
//!
//! The manager owns the fixed provider list, dispatches one search per
//! available provider concurrently, absorbs every per-provider failure into
//! an empty list, and interleaves the collected lists round-robin with
//! url-based deduplication. Its public operations never return an error:
//! the worst case is an empty result list.

use crate::config::SearchConfig;
use crate::providers::{BingProvider, DuckDuckGoProvider, LocalProvider, SerpApiProvider};
use crate::storage::SearchStore;
use crate::types::{SearchOptions, SearchProvider, SearchResult};
use futures::future::join_all;
use log::{debug, info, warn};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

/// Total results returned when the caller sets no limit
const DEFAULT_TOTAL_LIMIT: usize = 10;
/// Per-provider request size when the caller sets no limit
const DEFAULT_PER_PROVIDER_LIMIT: usize = 5;
/// Cap on aggregated suggestions
const MAX_SUGGESTIONS: usize = 10;

/// Aggregates results from a fixed, registration-ordered set of providers.
///
/// Constructed explicitly and passed down by the request-handling layer;
/// there is no process-wide instance. The provider list is immutable after
/// construction.
#[derive(Debug)]
pub struct SearchManager {
    providers: Vec<Arc<dyn SearchProvider>>,
    /// Last-resort provider used when the whole pipeline fails, and for
    /// suggestions when no suggestion-capable provider is available.
    fallback: Option<Arc<dyn SearchProvider>>,
}

impl SearchManager {
    /// Build the standard provider set: local store first, then the external
    /// providers in registration order.
    pub fn new(config: &SearchConfig, store: Arc<dyn SearchStore>) -> Self {
        let local: Arc<dyn SearchProvider> = Arc::new(LocalProvider::new(store));
        let providers: Vec<Arc<dyn SearchProvider>> = vec![
            Arc::clone(&local),
            Arc::new(DuckDuckGoProvider::new()),
            Arc::new(SerpApiProvider::new(config.serpapi_api_key.clone())),
            Arc::new(BingProvider::new(config.bing_api_key.clone())),
        ];

        Self {
            providers,
            fallback: Some(local),
        }
    }

    /// Build a manager over an arbitrary provider list. The first provider
    /// doubles as the fallback, matching the convention that the local
    /// provider registers first.
    pub fn with_providers(providers: Vec<Arc<dyn SearchProvider>>) -> Self {
        let fallback = providers.first().cloned();
        Self {
            providers,
            fallback,
        }
    }

    /// Providers currently able to serve requests. Recomputed on every call,
    /// never memoized, so a credential-presence change is always reflected.
    pub fn available_providers(&self) -> Vec<Arc<dyn SearchProvider>> {
        for provider in &self.providers {
            debug!(
                "provider {}: {}",
                provider.name(),
                if provider.is_available() {
                    "available"
                } else {
                    "not available"
                }
            );
        }

        self.providers
            .iter()
            .filter(|provider| provider.is_available())
            .cloned()
            .collect()
    }

    /// Query all available providers concurrently and merge their results
    /// into one deduplicated, round-robin-interleaved list.
    ///
    /// Infallible by construction: provider failures become empty lists, and
    /// a failure of the pipeline itself falls back to the local provider.
    pub async fn search(&self, query: &str, options: &SearchOptions) -> Vec<SearchResult> {
        let available = self.available_providers();
        if available.is_empty() {
            warn!("no search providers available for {query:?}");
            return Vec::new();
        }

        // Each provider call runs in its own task (see fan_out_and_merge);
        // this outer task is the last-resort guard so that a failure of the
        // dispatch/merge machinery itself falls back to the local provider
        // instead of unwinding into the caller.
        let pipeline = tokio::spawn(fan_out_and_merge(
            available,
            query.to_string(),
            options.clone(),
        ));

        match pipeline.await {
            Ok(results) => results,
            Err(err) => {
                warn!("search pipeline failed: {err}; falling back to the local provider");
                self.fallback_search(query, options).await
            }
        }
    }

    /// Aggregate suggestions from every available provider implementing the
    /// optional capability, deduplicated in first-appearance order and capped
    /// at 10. Falls back to the local provider when none qualify.
    pub async fn suggestions(&self, partial: &str) -> Vec<String> {
        let capable: Vec<_> = self
            .available_providers()
            .into_iter()
            .filter(|provider| provider.supports_suggestions())
            .collect();

        if capable.is_empty() {
            let Some(fallback) = &self.fallback else {
                return Vec::new();
            };
            if !fallback.supports_suggestions() {
                return Vec::new();
            }
            return match fallback.suggestions(partial).await {
                Ok(suggestions) => suggestions,
                Err(err) => {
                    warn!("fallback provider {} suggestions failed: {err}", fallback.name());
                    Vec::new()
                }
            };
        }

        // One spawned task per provider, as in the search path: an Err or a
        // panic inside a provider becomes an empty list, never an unwind
        // through this method.
        let (names, tasks): (Vec<String>, Vec<_>) = capable
            .iter()
            .map(|provider| {
                let name = provider.name().to_string();
                let provider = Arc::clone(provider);
                let partial = partial.to_string();
                let task = tokio::spawn(async move {
                    match provider.suggestions(&partial).await {
                        Ok(suggestions) => suggestions,
                        Err(err) => {
                            warn!("provider {} suggestions failed: {err}", provider.name());
                            Vec::new()
                        }
                    }
                });
                (name, task)
            })
            .unzip();

        let mut seen = HashSet::new();
        let mut merged = Vec::new();
        let lists = names
            .into_iter()
            .zip(join_all(tasks).await)
            .map(|(name, joined)| match joined {
                Ok(suggestions) => suggestions,
                Err(err) => {
                    warn!("provider {name} suggestion task failed: {err}");
                    Vec::new()
                }
            });
        for suggestion in lists.flatten() {
            if seen.insert(suggestion.clone()) {
                merged.push(suggestion);
                if merged.len() >= MAX_SUGGESTIONS {
                    break;
                }
            }
        }
        merged
    }

    async fn fallback_search(&self, query: &str, options: &SearchOptions) -> Vec<SearchResult> {
        let Some(fallback) = &self.fallback else {
            return Vec::new();
        };
        match fallback.search(query, options).await {
            Ok(mut results) => {
                assign_ids(&mut results);
                results
            }
            Err(err) => {
                warn!("fallback provider {} failed: {err}", fallback.name());
                Vec::new()
            }
        }
    }
}

/// Dispatch one spawned search task per provider, join all of them (never a
/// race), and merge. Every per-provider failure is wrapped into an empty
/// list: an `Err` inside the task, or a panic surfacing as a `JoinError`.
/// One misbehaving provider therefore never costs the others their results.
async fn fan_out_and_merge(
    providers: Vec<Arc<dyn SearchProvider>>,
    query: String,
    options: SearchOptions,
) -> Vec<SearchResult> {
    let total_limit = options.limit.unwrap_or(DEFAULT_TOTAL_LIMIT);
    // ceil(limit / n). This split can under-fill the requested total when
    // providers return fewer than their share or dedup removes overlaps;
    // there is deliberately no compensation pass.
    let per_provider_limit = options
        .limit
        .map(|limit| limit.div_ceil(providers.len()))
        .unwrap_or(DEFAULT_PER_PROVIDER_LIMIT);

    info!(
        "searching {query:?} across {} providers ({per_provider_limit} results each)",
        providers.len()
    );

    let mut per_call_options = options;
    per_call_options.limit = Some(per_provider_limit);

    let (names, tasks): (Vec<String>, Vec<_>) = providers
        .iter()
        .map(|provider| {
            let name = provider.name().to_string();
            let provider = Arc::clone(provider);
            let query = query.clone();
            let options = per_call_options.clone();
            let task = tokio::spawn(async move {
                match provider.search(&query, &options).await {
                    Ok(results) => {
                        debug!("provider {} returned {} results", provider.name(), results.len());
                        results
                    }
                    Err(err) => {
                        warn!("provider {} failed: {err}", provider.name());
                        Vec::new()
                    }
                }
            });
            (name, task)
        })
        .unzip();

    let provider_results: Vec<Vec<SearchResult>> = names
        .into_iter()
        .zip(join_all(tasks).await)
        .map(|(name, joined)| match joined {
            Ok(results) => results,
            Err(err) => {
                warn!("provider {name} search task failed: {err}");
                Vec::new()
            }
        })
        .collect();

    merge_round_robin(provider_results, total_limit)
}

/// Interleave per-provider lists in registration order: one cursor per list,
/// one result per provider per round, skipping urls already merged. Stops at
/// `limit` or when every list is exhausted, then re-assigns ids 1..N.
fn merge_round_robin(provider_results: Vec<Vec<SearchResult>>, limit: usize) -> Vec<SearchResult> {
    if limit == 0 {
        return Vec::new();
    }

    let mut queues: Vec<VecDeque<SearchResult>> =
        provider_results.into_iter().map(VecDeque::from).collect();
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut merged = Vec::new();

    'rounds: loop {
        let mut exhausted = true;
        for queue in &mut queues {
            let Some(candidate) = queue.pop_front() else {
                continue;
            };
            exhausted = false;

            // Duplicate urls are skipped without ending the round
            if seen_urls.insert(candidate.url.clone()) {
                merged.push(candidate);
                if merged.len() >= limit {
                    break 'rounds;
                }
            }
        }
        if exhausted {
            break;
        }
    }

    assign_ids(&mut merged);
    merged
}

/// Merged ids are positional, 1-based, and not stable across calls.
fn assign_ids(results: &mut [SearchResult]) {
    for (index, result) in results.iter_mut().enumerate() {
        result.id = (index + 1) as u32;
    }
}
