//! Cross-catalog search: normalized [`TrackRef`] in, target catalog link out.
//!
//! Same shape as extraction: each [`SearchStrategy`] is one backend, and a
//! [`SearchChain`] tries them in priority order with first-success
//! short-circuit. Exhausting the chain is [`Error::NotFound`].
//!
//! - Apple target: iTunes Search API, then the Apple Music web search page.
//! - Spotify target: external web search engines (see [`engines`]).

pub mod apple;
pub mod engines;
pub mod spotify;

use async_trait::async_trait;

use crate::error::{Error, FetchError, Result};
use crate::http::Fetch;
use crate::model::{Catalog, TrackRef};

use engines::WebSearchEngine;
use spotify::SpotifyWebSearch;

/// One search backend for a target catalog.
#[async_trait]
pub trait SearchStrategy: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Search for `track`. `Err` is a transport failure, `Ok(None)` a miss.
    async fn search(
        &self,
        fetch: &dyn Fetch,
        track: &TrackRef,
        storefront: &str,
    ) -> std::result::Result<Option<String>, FetchError>;
}

/// Ordered search backends for one target catalog.
pub struct SearchChain {
    catalog: Catalog,
    strategies: Vec<Box<dyn SearchStrategy>>,
}

impl SearchChain {
    pub fn new(catalog: Catalog, strategies: Vec<Box<dyn SearchStrategy>>) -> Self {
        Self {
            catalog,
            strategies,
        }
    }

    /// Apple Music target: iTunes API, then web search page.
    pub fn apple() -> Self {
        Self::new(Catalog::AppleMusic, apple::strategies())
    }

    /// Spotify target over the given web search engines, in order.
    pub fn spotify(engines: Vec<Box<dyn WebSearchEngine>>) -> Self {
        Self::new(
            Catalog::Spotify,
            vec![Box::new(SpotifyWebSearch::new(engines))],
        )
    }

    pub fn catalog(&self) -> Catalog {
        self.catalog
    }

    /// Run the chain until one backend finds a link.
    pub async fn search(&self, fetch: &dyn Fetch, track: &TrackRef, storefront: &str) -> Result<String> {
        for strategy in &self.strategies {
            match strategy.search(fetch, track, storefront).await {
                Ok(Some(url)) => {
                    tracing::info!(
                        catalog = %self.catalog,
                        strategy = strategy.name(),
                        %url,
                        "Found match"
                    );
                    return Ok(url);
                }
                Ok(None) => tracing::debug!(strategy = strategy.name(), %track, "No match"),
                Err(e) => {
                    tracing::debug!(strategy = strategy.name(), error = %e, "Search backend failed")
                }
            }
        }

        Err(Error::NotFound {
            query: track.query(),
        })
    }
}

/// Find `track` in Apple Music.
pub async fn search_apple(fetch: &dyn Fetch, track: &TrackRef, storefront: &str) -> Result<String> {
    SearchChain::apple().search(fetch, track, storefront).await
}

/// Find `track` on Spotify with the default engines.
pub async fn search_spotify(fetch: &dyn Fetch, track: &TrackRef) -> Result<String> {
    SearchChain::spotify(engines::default_engines())
        .search(fetch, track, "")
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::mocks::MockFetch;
    use crate::test_utils::{itunes_results, track};

    #[tokio::test]
    async fn test_api_hit_skips_web_fallback() {
        let fetch = MockFetch::new().route(
            "https://itunes.apple.com/search",
            &itunes_results(&[serde_json::json!({"trackViewUrl": "https://music.apple.com/us/song/hello/1"})]),
        );
        let url = search_apple(&fetch, &track("Adele", "Hello"), "us").await.unwrap();
        assert_eq!(url, "https://music.apple.com/us/song/hello/1");
        assert!(!fetch.was_requested("https://music.apple.com/"));
    }

    #[tokio::test]
    async fn test_zero_api_results_tries_web_fallback() {
        let fetch = MockFetch::new()
            .route("https://itunes.apple.com/search", &itunes_results(&[]))
            .route(
                "https://music.apple.com/us/search",
                r#"<a href="https://music.apple.com/us/song/hello/1051394215">Hello</a>"#,
            );
        let url = search_apple(&fetch, &track("Adele", "Hello"), "us").await.unwrap();
        assert_eq!(url, "https://music.apple.com/us/song/hello/1051394215");
        assert!(fetch.was_requested("https://music.apple.com/us/search?term="));
    }

    #[tokio::test]
    async fn test_exhausted_is_not_found() {
        let fetch = MockFetch::new().route("https://itunes.apple.com/search", &itunes_results(&[]));
        let result = search_apple(&fetch, &track("Adele", "Hello"), "us").await;
        assert_eq!(
            result,
            Err(Error::NotFound {
                query: "Adele Hello".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_spotify_not_found_after_matrix() {
        let fetch = MockFetch::new();
        let result = search_spotify(&fetch, &track("Adele", "Hello")).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
        assert_eq!(fetch.requests().len(), 6);
    }
}
