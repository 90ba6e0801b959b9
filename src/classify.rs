//! URL classification.
//!
//! Decides which [`LinkKind`] a raw URL string is, purely from its host,
//! path segments and query parameters. No I/O. The transport layer calls
//! [`classify`] to reject albums, playlists and foreign links before
//! handing anything to the resolver.

use url::Url;

use crate::model::LinkKind;

/// Host fragment identifying Apple Music links.
pub const APPLE_MUSIC_HOST: &str = "music.apple.com";

/// Host fragment identifying the Spotify web player.
pub const SPOTIFY_HOST: &str = "open.spotify.com";

/// Classify a raw URL. Total and deterministic: malformed input is
/// [`LinkKind::Unrecognized`], never an error.
pub fn classify(raw: &str) -> LinkKind {
    let Some(url) = parse_lenient(raw) else {
        return LinkKind::Unrecognized;
    };
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();

    if host.contains(APPLE_MUSIC_HOST) {
        if has_segment(&url, "song") {
            return LinkKind::AppleSong;
        }
        if has_segment(&url, "album")
            && let Some(track_id) = track_index(&url)
        {
            return LinkKind::AppleAlbumWithTrackIndex { track_id };
        }
        return LinkKind::AppleOther;
    }

    if host.contains(SPOTIFY_HOST) {
        if has_segment(&url, "track") {
            let track_id = segment_after(&url, "track").unwrap_or_default();
            return LinkKind::SpotifyTrack { track_id };
        }
        return LinkKind::SpotifyOther;
    }

    LinkKind::Unrecognized
}

/// The numeric track ID carried in an Apple album URL's `i` parameter.
pub fn apple_track_index(raw: &str) -> Option<String> {
    track_index(&parse_lenient(raw)?)
}

/// The track ID of a Spotify `/track/<id>` URL, if it looks like one.
///
/// A track link with a missing or malformed ID still classifies as a track;
/// it just has no ID for the ID-based page strategies to use.
pub fn spotify_track_id(raw: &str) -> Option<String> {
    match classify(raw) {
        LinkKind::SpotifyTrack { track_id } if is_spotify_id(&track_id) => Some(track_id),
        _ => None,
    }
}

/// Parse a URL, tolerating a missing scheme ("music.apple.com/us/...").
fn parse_lenient(raw: &str) -> Option<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Url::parse(raw)
        .ok()
        .filter(|u| u.host_str().is_some())
        .or_else(|| Url::parse(&format!("https://{raw}")).ok())
        .filter(|u| matches!(u.scheme(), "http" | "https"))
}

fn has_segment(url: &Url, name: &str) -> bool {
    url.path_segments()
        .is_some_and(|mut segments| segments.any(|s| s.eq_ignore_ascii_case(name)))
}

fn track_index(url: &Url) -> Option<String> {
    url.query_pairs()
        .filter(|(k, _)| k == "i")
        .map(|(_, v)| v.into_owned())
        .find(|v| !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit()))
}

/// The segment right after `name`, possibly empty.
///
/// Locale prefixes such as `/intl-de/track/<id>` are skipped over naturally.
fn segment_after(url: &Url, name: &str) -> Option<String> {
    let mut segments = url.path_segments()?;
    segments.find(|s| s.eq_ignore_ascii_case(name))?;
    Some(segments.next()?.to_string())
}

fn is_spotify_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_alphanumeric())
}
