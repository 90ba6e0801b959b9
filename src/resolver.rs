//! Conversion orchestrator - the single entry point of the pipeline
//!
//! One resolution runs these steps in order:
//! 1. Classify the link and reject anything that is not a single track
//! 2. Canonicalize Apple album links (`?i=<trackId>`) to song links
//! 3. Extract (artist, title) from the source catalog
//! 4. Search the opposite catalog for the same track
//!
//! The whole chain runs under one deadline. Per-request timeouts live in the
//! HTTP client; nothing is retried after the deadline fires.

use std::sync::Arc;
use std::time::Duration;

use crate::canonical::canonicalize_apple_album;
use crate::classify::classify;
use crate::error::{Error, Result};
use crate::extract::Extractor;
use crate::http::Fetch;
use crate::itunes::DEFAULT_STOREFRONT;
use crate::model::{Catalog, LinkKind};
use crate::search::SearchChain;
use crate::search::engines::{WebSearchEngine, default_engines, engine_by_name};

/// Configuration for the resolver
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Storefront used when the caller passes none
    pub default_storefront: String,
    /// Deadline for one whole resolution
    pub overall_timeout: Duration,
    /// Extract from the album page itself when album canonicalization fails
    pub album_page_fallback: bool,
    /// Web search backends for Spotify, in order
    pub spotify_engines: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_storefront: DEFAULT_STOREFRONT.to_string(),
            overall_timeout: Duration::from_secs(8),
            album_page_fallback: false,
            spotify_engines: vec![
                "duckduckgo".to_string(),
                "brave".to_string(),
                "bing".to_string(),
            ],
        }
    }
}

/// Converts track links between Apple Music and Spotify.
///
/// Built once and shared. Holds no per-resolution state, so concurrent
/// calls for different URLs are independent.
pub struct Resolver {
    config: ResolverConfig,
    fetch: Arc<dyn Fetch>,
    spotify_extractor: Extractor,
    apple_extractor: Extractor,
    spotify_search: SearchChain,
    apple_search: SearchChain,
}

impl Resolver {
    /// Create a resolver with the default strategy chains
    pub fn new(config: ResolverConfig, fetch: Arc<dyn Fetch>) -> Self {
        let engines = engines_from_names(&config.spotify_engines);
        Self {
            spotify_extractor: Extractor::spotify(),
            apple_extractor: Extractor::apple(),
            spotify_search: SearchChain::spotify(engines),
            apple_search: SearchChain::apple(),
            config,
            fetch,
        }
    }

    /// Replace the extraction chain for the extractor's catalog
    pub fn with_extractor(mut self, extractor: Extractor) -> Self {
        match extractor.catalog() {
            Catalog::Spotify => self.spotify_extractor = extractor,
            Catalog::AppleMusic => self.apple_extractor = extractor,
        }
        self
    }

    /// Replace the search chain for the chain's target catalog
    pub fn with_search(mut self, search: SearchChain) -> Self {
        match search.catalog() {
            Catalog::Spotify => self.spotify_search = search,
            Catalog::AppleMusic => self.apple_search = search,
        }
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve `url` to the opposite catalog, or nothing.
    ///
    /// Every failure degrades to `None`; use [`Resolver::convert`] to learn why.
    pub async fn resolve(&self, url: &str, storefront: &str) -> Option<String> {
        match self.convert(url, storefront).await {
            Ok(link) => Some(link),
            Err(e) => {
                tracing::info!(%url, error = %e, "No conversion");
                None
            }
        }
    }

    /// Resolve `url` to the opposite catalog under the overall deadline.
    pub async fn convert(&self, url: &str, storefront: &str) -> Result<String> {
        let storefront = self.storefront(storefront);
        let timeout = self.config.overall_timeout;

        match tokio::time::timeout(timeout, self.convert_inner(url.trim(), &storefront)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(%url, timeout_ms = timeout.as_millis() as u64, "Resolution timed out");
                Err(Error::Timeout {
                    timeout_ms: timeout.as_millis() as u64,
                })
            }
        }
    }

    async fn convert_inner(&self, url: &str, storefront: &str) -> Result<String> {
        let fetch = self.fetch.as_ref();
        let kind = classify(url);
        tracing::debug!(%url, %kind, "Classified link");

        let track = match &kind {
            LinkKind::SpotifyTrack { .. } => self.spotify_extractor.extract(fetch, url).await?,
            LinkKind::AppleSong => self.apple_extractor.extract(fetch, url).await?,
            LinkKind::AppleAlbumWithTrackIndex { .. } => {
                match canonicalize_apple_album(fetch, url, storefront).await {
                    Ok(song_url) => self.apple_extractor.extract(fetch, &song_url).await?,
                    Err(e) if self.config.album_page_fallback => {
                        tracing::debug!(error = %e, "Falling back to album page");
                        self.apple_extractor.extract(fetch, url).await?
                    }
                    Err(e) => return Err(e),
                }
            }
            _ => {
                return Err(Error::Unrecognized {
                    kind: kind.clone(),
                    url: url.to_string(),
                });
            }
        };

        match kind.catalog().map(Catalog::opposite) {
            Some(Catalog::AppleMusic) => self.apple_search.search(fetch, &track, storefront).await,
            Some(Catalog::Spotify) => self.spotify_search.search(fetch, &track, storefront).await,
            None => Err(Error::Unrecognized {
                kind,
                url: url.to_string(),
            }),
        }
    }

    fn storefront(&self, requested: &str) -> String {
        let requested = requested.trim();
        if requested.is_empty() {
            self.config.default_storefront.to_ascii_lowercase()
        } else {
            requested.to_ascii_lowercase()
        }
    }
}

/// Map configured engine names to engines, skipping unknown ones.
fn engines_from_names(names: &[String]) -> Vec<Box<dyn WebSearchEngine>> {
    let engines: Vec<_> = names
        .iter()
        .filter_map(|name| {
            let engine = engine_by_name(name);
            if engine.is_none() {
                tracing::warn!(%name, "Unknown search engine in config, skipping");
            }
            engine
        })
        .collect();

    if engines.is_empty() {
        tracing::warn!("No usable search engines configured, using defaults");
        return default_engines();
    }
    engines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::extract::ExtractionStrategy;
    use crate::http::mocks::MockFetch;
    use crate::model::TrackRef;
    use crate::search::SearchStrategy;
    use crate::test_utils::{html_page, itunes_results, track};
    use async_trait::async_trait;
    use std::time::Instant;

    struct FixedExtraction(TrackRef);

    #[async_trait]
    impl ExtractionStrategy for FixedExtraction {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn extract(
            &self,
            _fetch: &dyn Fetch,
            _url: &str,
        ) -> std::result::Result<Option<TrackRef>, FetchError> {
            Ok(Some(self.0.clone()))
        }
    }

    struct FixedSearch(&'static str);

    #[async_trait]
    impl SearchStrategy for FixedSearch {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn search(
            &self,
            _fetch: &dyn Fetch,
            track: &TrackRef,
            _storefront: &str,
        ) -> std::result::Result<Option<String>, FetchError> {
            assert_eq!(track, &crate::test_utils::track("Artist", "Title"));
            Ok(Some(self.0.to_string()))
        }
    }

    fn resolver(fetch: MockFetch) -> Resolver {
        Resolver::new(ResolverConfig::default(), Arc::new(fetch))
    }

    #[tokio::test]
    async fn test_spotify_to_apple_with_mocked_stages() {
        let apple_url = "https://music.apple.com/us/song/title/42";
        let resolver = resolver(MockFetch::new())
            .with_extractor(Extractor::new(
                Catalog::Spotify,
                vec![Box::new(FixedExtraction(track("Artist", "Title")))],
            ))
            .with_search(SearchChain::new(
                Catalog::AppleMusic,
                vec![Box::new(FixedSearch(apple_url))],
            ));

        let result = resolver
            .resolve("https://open.spotify.com/track/abc123", "us")
            .await;
        assert_eq!(result.as_deref(), Some(apple_url));
    }

    #[tokio::test]
    async fn test_spotify_to_apple_over_mock_network() {
        let fetch = MockFetch::new()
            .route(
                "https://open.spotify.com/oembed",
                r#"{"title": "Hello", "author_name": "Adele"}"#,
            )
            .route(
                "https://itunes.apple.com/search",
                &itunes_results(&[serde_json::json!({
                    "kind": "song",
                    "trackViewUrl": "https://music.apple.com/gb/album/hello/1051394208?i=1051394215&uo=4"
                })]),
            );
        let result = resolver(fetch)
            .convert("https://open.spotify.com/track/4sPmO7WMQUAf45kwMOtONw?si=x", "GB")
            .await;
        assert_eq!(
            result,
            Ok("https://music.apple.com/gb/album/hello/1051394208?i=1051394215".to_string())
        );
    }

    #[tokio::test]
    async fn test_apple_album_to_spotify() {
        let fetch = MockFetch::new()
            .route(
                "https://itunes.apple.com/lookup?id=1051394215",
                &itunes_results(&[serde_json::json!({
                    "kind": "song",
                    "trackViewUrl": "https://music.apple.com/us/song/hello/1051394215"
                })]),
            )
            .route(
                "https://music.apple.com/us/song/hello/1051394215",
                &html_page(&[("og:title", "Hello - Adele - Apple Music")], None, ""),
            )
            .route(
                "https://html.duckduckgo.com/",
                r#"<a href="https://open.spotify.com/intl-de/track/4sPmO7WMQUAf45kwMOtONw?si=1">Hello</a>"#,
            );
        let result = resolver(fetch)
            .convert(
                "https://music.apple.com/us/album/25/1051394208?i=1051394215",
                "us",
            )
            .await;
        assert_eq!(
            result,
            Ok("https://open.spotify.com/track/4sPmO7WMQUAf45kwMOtONw".to_string())
        );
    }

    #[tokio::test]
    async fn test_failed_canonicalization_is_reported() {
        let fetch = MockFetch::new().route("https://itunes.apple.com/lookup", &itunes_results(&[]));
        let result = resolver(fetch)
            .convert("https://music.apple.com/us/album/x/1234567?i=1234568", "us")
            .await;
        assert!(matches!(result, Err(Error::CanonicalizationUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_album_page_fallback_when_enabled() {
        let album_url = "https://music.apple.com/us/album/x/1234567?i=1234568";
        let fetch = MockFetch::new()
            .route("https://itunes.apple.com/lookup", &itunes_results(&[]))
            .route(album_url, &html_page(&[("og:title", "Hello - Adele - Apple Music")], None, ""))
            .route(
                "https://html.duckduckgo.com/",
                r#"<a href="https://open.spotify.com/track/abc">Hello</a>"#,
            );
        let config = ResolverConfig {
            album_page_fallback: true,
            ..ResolverConfig::default()
        };
        let result = Resolver::new(config, Arc::new(fetch))
            .convert(album_url, "us")
            .await;
        assert_eq!(result, Ok("https://open.spotify.com/track/abc".to_string()));
    }

    #[tokio::test]
    async fn test_track_link_without_id_is_not_found_rather_than_rejected() {
        let result = resolver(MockFetch::new())
            .convert("https://open.spotify.com/track/", "us")
            .await;
        assert!(matches!(result, Err(Error::ExtractionFailed { .. })), "{result:?}");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_resolutions_share_one_resolver() {
        let fetch = MockFetch::new()
            .route(
                "https://open.spotify.com/oembed?url=https%3A%2F%2Fopen.spotify.com%2Ftrack%2Faaa",
                r#"{"title": "Hello", "author_name": "Adele"}"#,
            )
            .route(
                "https://open.spotify.com/oembed?url=https%3A%2F%2Fopen.spotify.com%2Ftrack%2Fbbb",
                r#"{"title": "One More Time", "author_name": "Daft Punk"}"#,
            )
            .route(
                "https://itunes.apple.com/search?media=music&entity=song&limit=10&country=us&term=Adele%20Hello",
                &itunes_results(&[serde_json::json!({"trackViewUrl": "https://music.apple.com/us/song/hello/1"})]),
            )
            .route(
                "https://itunes.apple.com/search?media=music&entity=song&limit=10&country=us&term=Daft%20Punk%20One%20More%20Time",
                &itunes_results(&[serde_json::json!({"trackViewUrl": "https://music.apple.com/us/song/one-more-time/2"})]),
            );
        let resolver = Arc::new(resolver(fetch));

        let handles: Vec<_> = ["aaa", "bbb", "aaa", "bbb"]
            .into_iter()
            .map(|id| {
                let resolver = Arc::clone(&resolver);
                tokio::spawn(async move {
                    let url = format!("https://open.spotify.com/track/{id}");
                    (id, resolver.resolve(&url, "us").await)
                })
            })
            .collect();

        for handle in handles {
            let (id, link) = handle.await.unwrap();
            let expected = match id {
                "aaa" => "https://music.apple.com/us/song/hello/1",
                _ => "https://music.apple.com/us/song/one-more-time/2",
            };
            assert_eq!(link.as_deref(), Some(expected));
        }
    }

    #[tokio::test]
    async fn test_rejects_non_track_links_without_network() {
        let resolver = resolver(MockFetch::new());
        for url in [
            "https://open.spotify.com/album/xyz",
            "https://music.apple.com/us/album/x/1234567",
            "https://example.com/track/1",
            "not a url",
        ] {
            let result = resolver.convert(url, "us").await;
            assert!(
                matches!(result, Err(Error::Unrecognized { .. })),
                "{url}: {result:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_extraction_failure_resolves_to_none() {
        let resolver = resolver(MockFetch::new());
        let result = resolver
            .resolve("https://open.spotify.com/track/abc123", "us")
            .await;
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_hanging_network_times_out() {
        let config = ResolverConfig {
            overall_timeout: Duration::from_millis(100),
            ..ResolverConfig::default()
        };
        let resolver = Resolver::new(config, Arc::new(MockFetch::hanging()));

        let started = Instant::now();
        let result = resolver
            .convert("https://open.spotify.com/track/abc123", "us")
            .await;

        assert_eq!(result, Err(Error::Timeout { timeout_ms: 100 }));
        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(
            resolver.resolve("https://open.spotify.com/track/abc123", "us").await,
            None
        );
    }

    #[test]
    fn test_storefront_defaults_and_lowercases() {
        let resolver = resolver(MockFetch::new());
        assert_eq!(resolver.storefront(""), "us");
        assert_eq!(resolver.storefront(" GB "), "gb");
    }

    #[test]
    fn test_unknown_engines_are_skipped() {
        let engines = engines_from_names(&["bing".to_string(), "altavista".to_string()]);
        assert_eq!(engines.len(), 1);
        assert_eq!(engines[0].name(), "bing");
        assert_eq!(engines_from_names(&[]).len(), 3);
    }
}
