//! Title pattern matching.
//!
//! Page titles and oEmbed titles pack artist and title into one string, and
//! each catalog has its own habits ("Title - song and lyrics by Artist",
//! "Song «Title» — Artist", ...). [`split_title_artist`] walks an ordered
//! pattern table for the given catalog style and returns the first split
//! where both sides survive normalization.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::TrackRef;

/// Which catalog's title conventions to expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleStyle {
    Spotify,
    Apple,
}

/// A named regex whose first group is the title and second the artist.
struct TitlePattern {
    name: &'static str,
    regex: Regex,
}

impl TitlePattern {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).unwrap(),
        }
    }

    fn apply(&self, text: &str) -> Option<TrackRef> {
        let caps = self.regex.captures(text)?;
        let title = caps.get(1)?.as_str();
        let artist = caps.get(2)?.as_str();
        TrackRef::normalized(artist, title)
    }
}

static SPOTIFY_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*\|\s*Spotify\s*$").unwrap());

static SPOTIFY_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:title|titel|название)\s*[:\-–—]\s*").unwrap()
});

static SPOTIFY_PATTERNS: LazyLock<Vec<TitlePattern>> = LazyLock::new(|| {
    vec![
        TitlePattern::new("bullet", r"^(.+?)\s+•\s+([^•]+?)(?:\s+•.*)?$"),
        TitlePattern::new(
            "song-by",
            r"(?i)^(.*?)\s+[–—-]\s+(?:song|single)\b.*?\s+by\s+(.+)$",
        ),
        TitlePattern::new("em-dash", r"^(.+?)\s+—\s+(.+)$"),
        TitlePattern::new("by", r"(?i)^(.+?)\s+by\s+(.+)$"),
        TitlePattern::new("dash", r"^(.+?)\s+[–—-]\s+(.+)$"),
    ]
});

static APPLE_PATTERNS: LazyLock<Vec<TitlePattern>> = LazyLock::new(|| {
    vec![
        TitlePattern::new(
            "song-quoted",
            r#"(?i)^(?:song|песня)\s+[«"“]([^»”"]+)[»”"]\s+[—–-]\s+(.+)$"#,
        ),
        TitlePattern::new(
            "apple-music-suffix",
            r"(?i)^(.*?)\s*[-–—]\s*(.*?)\s*[-–—]\s*Apple\s*Music$",
        ),
        TitlePattern::new("em-dash", r"^(.+?)\s*—\s*(.+)$"),
        TitlePattern::new("by-on-apple-music", r"(?i)^(.+?)\s+by\s+(.+?)\s+on\s+Apple\s*Music$"),
    ]
});

static DASH_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)\s*[–—-]\s*(.+)$").unwrap());

/// Split a raw title string into (artist, title).
///
/// Returns `None` when no pattern matches; that is the caller's cue to try
/// the next raw-text source, not an error.
pub fn split_title_artist(text: &str, style: TitleStyle) -> Option<TrackRef> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    match style {
        TitleStyle::Spotify => {
            let stripped = SPOTIFY_SUFFIX.replace(text, "");
            let stripped = SPOTIFY_LABEL.replace(&stripped, "");
            first_match(&SPOTIFY_PATTERNS, &stripped)
        }
        TitleStyle::Apple => first_match(&APPLE_PATTERNS, text),
    }
}

/// Last-resort split on the first dash of any width, spaces optional.
pub fn split_dash(text: &str) -> Option<TrackRef> {
    let caps = DASH_SPLIT.captures(text.trim())?;
    TrackRef::normalized(caps.get(2)?.as_str(), caps.get(1)?.as_str())
}

fn first_match(patterns: &[TitlePattern], text: &str) -> Option<TrackRef> {
    patterns.iter().find_map(|p| {
        let track = p.apply(text)?;
        tracing::trace!(pattern = p.name, "Title pattern matched");
        Some(track)
    })
}
