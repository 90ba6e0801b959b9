//! Metadata extraction: track page URL in, normalized [`TrackRef`] out.
//!
//! # Architecture
//!
//! - [`ExtractionStrategy`]: one way of getting (artist, title) for a URL
//!   (an oEmbed call, one page rendering). Returns `Ok(None)` when its
//!   source was read but held nothing usable.
//! - [`PageStrategy`]: fetches one page rendering and runs an ordered list of
//!   [`PageSource`]s (meta tags, embedded JSON, `<title>`) against it.
//! - [`Extractor`]: an ordered strategy chain for one catalog. First success
//!   wins; partial results are never merged. Exhausting the chain is the
//!   ordinary [`Error::ExtractionFailed`] outcome.
//!
//! Catalog chains live in [`spotify`] and [`apple`].

pub mod apple;
pub mod html;
pub mod json;
pub mod spotify;

use async_trait::async_trait;

use crate::error::{Error, FetchError, Result};
use crate::http::Fetch;
use crate::model::{Catalog, TrackRef};

use html::Page;

/// One way of extracting a track identity from a catalog URL.
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Try to extract. `Err` is a transport failure, `Ok(None)` a miss.
    async fn extract(&self, fetch: &dyn Fetch, url: &str)
    -> std::result::Result<Option<TrackRef>, FetchError>;
}

/// Reads one piece of a fetched page. Receives the caller's original URL.
pub type PageSource = fn(&Page, &str) -> Option<TrackRef>;

/// Fetch a page rendering derived from the input URL, then try each source.
pub struct PageStrategy {
    name: &'static str,
    page_url: fn(&str) -> Option<String>,
    sources: &'static [(&'static str, PageSource)],
}

impl PageStrategy {
    pub const fn new(
        name: &'static str,
        page_url: fn(&str) -> Option<String>,
        sources: &'static [(&'static str, PageSource)],
    ) -> Self {
        Self {
            name,
            page_url,
            sources,
        }
    }
}

#[async_trait]
impl ExtractionStrategy for PageStrategy {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn extract(
        &self,
        fetch: &dyn Fetch,
        url: &str,
    ) -> std::result::Result<Option<TrackRef>, FetchError> {
        let Some(page_url) = (self.page_url)(url) else {
            return Ok(None);
        };
        let page = Page::parse(fetch.get_text(&page_url).await?);

        Ok(self.sources.iter().find_map(|(source, read)| {
            let track = read(&page, url)?;
            tracing::debug!(strategy = self.name, source, "Page source matched");
            Some(track)
        }))
    }
}

/// Ordered extraction chain for one catalog.
pub struct Extractor {
    catalog: Catalog,
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl Extractor {
    pub fn new(catalog: Catalog, strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self {
            catalog,
            strategies,
        }
    }

    /// The default Spotify chain: oEmbed, player page, embed page.
    pub fn spotify() -> Self {
        Self::new(Catalog::Spotify, spotify::strategies())
    }

    /// The default Apple Music chain: the song page itself.
    pub fn apple() -> Self {
        Self::new(Catalog::AppleMusic, apple::strategies())
    }

    pub fn catalog(&self) -> Catalog {
        self.catalog
    }

    /// Run the chain until one strategy yields a track.
    pub async fn extract(&self, fetch: &dyn Fetch, url: &str) -> Result<TrackRef> {
        for strategy in &self.strategies {
            match strategy.extract(fetch, url).await {
                Ok(Some(track)) => {
                    tracing::info!(
                        catalog = %self.catalog,
                        strategy = strategy.name(),
                        %track,
                        "Extracted track"
                    );
                    return Ok(track);
                }
                Ok(None) => {
                    tracing::debug!(strategy = strategy.name(), "No usable metadata");
                }
                Err(e) => {
                    tracing::debug!(strategy = strategy.name(), error = %e, "Extraction step failed");
                }
            }
        }

        Err(Error::ExtractionFailed {
            url: url.to_string(),
        })
    }
}

/// Extract (artist, title) from a Spotify track URL.
pub async fn extract_spotify(fetch: &dyn Fetch, url: &str) -> Result<TrackRef> {
    Extractor::spotify().extract(fetch, url).await
}

/// Extract (artist, title) from an Apple Music song URL.
pub async fn extract_apple(fetch: &dyn Fetch, url: &str) -> Result<TrackRef> {
    Extractor::apple().extract(fetch, url).await
}
