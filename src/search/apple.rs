//! Apple Music search backends.
//!
//! The iTunes Search API first (requested storefront, then the default
//! storefront), then a scrape of the catalog's own web search page.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use super::SearchStrategy;
use crate::error::FetchError;
use crate::http::Fetch;
use crate::itunes::{DEFAULT_STOREFRONT, ItunesClient};
use crate::model::TrackRef;

static APPLE_SONG_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https://music\.apple\.com/[a-z]{2}/song/[^"'\s<>/?\\]+/\d+"#).unwrap()
});

/// The Apple chain, in priority order.
pub fn strategies() -> Vec<Box<dyn SearchStrategy>> {
    vec![Box::new(ItunesSearch), Box::new(AppleWebSearch)]
}

/// iTunes Search API, `entity=song`.
pub struct ItunesSearch;

#[async_trait]
impl SearchStrategy for ItunesSearch {
    fn name(&self) -> &'static str {
        "itunes api"
    }

    async fn search(
        &self,
        fetch: &dyn Fetch,
        track: &TrackRef,
        storefront: &str,
    ) -> Result<Option<String>, FetchError> {
        let client = ItunesClient::new(fetch);
        let term = track.query_artist_first();

        let mut last_error = None;
        let mut any_answered = false;
        for country in storefronts(storefront) {
            match client.search_song_url(&term, &country).await {
                Ok(Some(url)) => return Ok(Some(url)),
                Ok(None) => {
                    any_answered = true;
                    tracing::debug!(%country, %term, "No iTunes results");
                }
                Err(e) => {
                    tracing::debug!(%country, error = %e, "iTunes search failed");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if !any_answered => Err(e),
            _ => Ok(None),
        }
    }
}

/// Requested storefront, then the default one if different.
fn storefronts(requested: &str) -> Vec<String> {
    let requested = requested.trim().to_ascii_lowercase();
    if requested.is_empty() || requested == DEFAULT_STOREFRONT {
        vec![DEFAULT_STOREFRONT.to_string()]
    } else {
        vec![requested, DEFAULT_STOREFRONT.to_string()]
    }
}

/// Scrape of `music.apple.com/<storefront>/search`.
pub struct AppleWebSearch;

#[async_trait]
impl SearchStrategy for AppleWebSearch {
    fn name(&self) -> &'static str {
        "apple web search"
    }

    async fn search(
        &self,
        fetch: &dyn Fetch,
        track: &TrackRef,
        storefront: &str,
    ) -> Result<Option<String>, FetchError> {
        let storefront = match storefront.trim() {
            "" => DEFAULT_STOREFRONT.to_string(),
            s => s.to_ascii_lowercase(),
        };
        let url = format!(
            "https://music.apple.com/{}/search?term={}",
            urlencoding::encode(&storefront),
            urlencoding::encode(&track.query_artist_first()),
        );
        let html = fetch.get_text(&url).await?;
        Ok(first_song_link(&html))
    }
}

/// First song URL on a page; JSON-escaped slashes are accepted.
fn first_song_link(html: &str) -> Option<String> {
    let unescaped = html.replace("\\/", "/");
    APPLE_SONG_URL
        .find(&unescaped)
        .map(|m| m.as_str().to_string())
}
