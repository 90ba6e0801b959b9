//! iTunes Search API client
//!
//! Thin wrapper over [`Fetch`] that builds Search/Lookup URLs and decodes
//! the responses. The client is borrowed per resolution and holds no state
//! of its own.

use super::{adapter, dto};
use crate::error::FetchError;
use crate::http::{Fetch, get_json};

/// The catalog's default region; searches fall back to it.
pub const DEFAULT_STOREFRONT: &str = "us";

const BASE_URL: &str = "https://itunes.apple.com";

/// iTunes Search/Lookup client over a shared transport.
pub struct ItunesClient<'a> {
    fetch: &'a dyn Fetch,
}

impl<'a> ItunesClient<'a> {
    pub fn new(fetch: &'a dyn Fetch) -> Self {
        Self { fetch }
    }

    /// Look up a numeric track ID and return its direct song URL.
    pub async fn lookup_song_url(
        &self,
        track_id: &str,
        storefront: &str,
    ) -> Result<Option<String>, FetchError> {
        let url = format!(
            "{BASE_URL}/lookup?id={}&country={}&entity=song",
            urlencoding::encode(track_id),
            urlencoding::encode(&storefront.to_ascii_lowercase()),
        );
        let response: dto::SearchResponse = get_json(self.fetch, &url).await?;
        Ok(adapter::pick_song_url(&response.results))
    }

    /// Search songs in one storefront and return the first result's link.
    pub async fn search_song_url(
        &self,
        term: &str,
        storefront: &str,
    ) -> Result<Option<String>, FetchError> {
        let url = format!(
            "{BASE_URL}/search?media=music&entity=song&limit=10&country={}&term={}",
            urlencoding::encode(&storefront.to_ascii_lowercase()),
            urlencoding::encode(term),
        );
        let response: dto::SearchResponse = get_json(self.fetch, &url).await?;
        Ok(adapter::first_result_url(&response.results))
    }
}
