//! Adapter layer: pick URLs out of iTunes DTOs
//!
//! The only place that knows which result fields carry links.

use url::Url;

use super::dto::Item;

/// Canonicalization pick: the first song with a direct URL, else the first
/// entry with any direct track URL.
pub fn pick_song_url(results: &[Item]) -> Option<String> {
    results
        .iter()
        .find(|item| item.kind.as_deref() == Some("song") && has_text(&item.track_view_url))
        .or_else(|| results.iter().find(|item| has_text(&item.track_view_url)))
        .and_then(|item| item.track_view_url.as_deref())
        .map(tidy_apple_url)
}

/// Search pick: the first result's track link, or its collection link.
pub fn first_result_url(results: &[Item]) -> Option<String> {
    let first = results.first()?;
    [&first.track_view_url, &first.collection_view_url]
        .into_iter()
        .find(|url| has_text(url))
        .and_then(|url| url.as_deref())
        .map(tidy_apple_url)
}

/// Drop the `uo` affiliate/tracking parameter the API appends.
pub fn tidy_apple_url(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return raw.to_string();
    };
    if !url.query_pairs().any(|(k, _)| k == "uo") {
        return raw.to_string();
    }

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "uo")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }
    url.to_string()
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}
