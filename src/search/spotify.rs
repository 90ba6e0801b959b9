//! Spotify search via external web search engines.
//!
//! Spotify has no keyless search API, so we ask general search engines for
//! `site:open.spotify.com/track <query>`. Two query orderings hedge against
//! engines weighting the first term: all engines are tried for
//! "{artist} {title}" before any engine sees "{title} {artist}".

use async_trait::async_trait;

use super::SearchStrategy;
use super::engines::{WebSearchEngine, default_engines};
use crate::error::FetchError;
use crate::http::Fetch;
use crate::model::TrackRef;

/// `site:` qualifier scoping results to track pages.
pub const SITE_QUALIFIER: &str = "site:open.spotify.com/track";

/// Ordering × engine matrix over web search engines.
pub struct SpotifyWebSearch {
    engines: Vec<Box<dyn WebSearchEngine>>,
}

impl SpotifyWebSearch {
    pub fn new(engines: Vec<Box<dyn WebSearchEngine>>) -> Self {
        Self { engines }
    }
}

impl Default for SpotifyWebSearch {
    fn default() -> Self {
        Self::new(default_engines())
    }
}

#[async_trait]
impl SearchStrategy for SpotifyWebSearch {
    fn name(&self) -> &'static str {
        "web search"
    }

    async fn search(
        &self,
        fetch: &dyn Fetch,
        track: &TrackRef,
        _storefront: &str,
    ) -> Result<Option<String>, FetchError> {
        let mut last_error = None;
        let mut any_answered = false;

        for query in [track.query_artist_first(), track.query_title_first()] {
            let scoped = format!("{SITE_QUALIFIER} {query}");
            for engine in &self.engines {
                let url = engine.search_url(&scoped);
                match fetch.get_text(&url).await {
                    Ok(html) => {
                        any_answered = true;
                        if let Some(link) = engine.extract_link(&html) {
                            tracing::debug!(engine = engine.name(), %query, "Web search hit");
                            return Ok(Some(link));
                        }
                        tracing::debug!(engine = engine.name(), %query, "No track link on results page");
                    }
                    Err(e) => {
                        tracing::debug!(engine = engine.name(), error = %e, "Web search failed");
                        last_error = Some(e);
                    }
                }
            }
        }

        match last_error {
            Some(e) if !any_answered => Err(e),
            _ => Ok(None),
        }
    }
}
