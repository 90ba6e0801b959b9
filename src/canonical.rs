//! Canonicalization of Apple Music album links.
//!
//! An album URL with `?i=<trackId>` points at one track on the album. The
//! iTunes Lookup API turns that track ID into a direct song URL, which the
//! Apple extractor can read. Any failure here is reported as
//! [`Error::CanonicalizationUnavailable`]; it is never fatal.

use crate::classify::apple_track_index;
use crate::error::{Error, Result};
use crate::http::Fetch;
use crate::itunes::ItunesClient;

/// Resolve an Apple album-with-track-index URL to a direct song URL.
pub async fn canonicalize_apple_album(
    fetch: &dyn Fetch,
    url: &str,
    storefront: &str,
) -> Result<String> {
    let unavailable = || Error::CanonicalizationUnavailable {
        url: url.to_string(),
    };

    let Some(track_id) = apple_track_index(url) else {
        return Err(unavailable());
    };

    match ItunesClient::new(fetch)
        .lookup_song_url(&track_id, storefront)
        .await
    {
        Ok(Some(song_url)) => {
            tracing::debug!(%track_id, %song_url, "Canonicalized album link");
            Ok(song_url)
        }
        Ok(None) => {
            tracing::warn!(%track_id, "Lookup returned no track URL");
            Err(unavailable())
        }
        Err(e) => {
            tracing::warn!(%track_id, error = %e, "Track lookup failed");
            Err(unavailable())
        }
    }
}
