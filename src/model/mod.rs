//! Core data models for link resolution.
//!
//! Defines the request-scoped values that flow through the pipeline:
//! [`TrackRef`], [`LinkKind`] and [`Catalog`]. None of them outlive a single
//! resolution call.

use std::fmt;

use crate::text::normalize::{normalize_artist, normalize_query_term, normalize_title};

/// A streaming catalog the pipeline can read from and search in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Catalog {
    AppleMusic,
    Spotify,
}

impl Catalog {
    /// The catalog a link from `self` gets converted into.
    pub fn opposite(self) -> Self {
        match self {
            Self::AppleMusic => Self::Spotify,
            Self::Spotify => Self::AppleMusic,
        }
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AppleMusic => f.write_str("Apple Music"),
            Self::Spotify => f.write_str("Spotify"),
        }
    }
}

/// Classification of an input URL.
///
/// Resolvable kinds carry the identifier the classifier pulled out of the URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// `music.apple.com/.../song/...`
    AppleSong,
    /// `music.apple.com/.../album/...?i=<digits>`
    AppleAlbumWithTrackIndex { track_id: String },
    /// Any other Apple Music link (album, playlist, artist)
    AppleOther,
    /// `open.spotify.com/track/<id>`
    SpotifyTrack { track_id: String },
    /// Any other Spotify link
    SpotifyOther,
    /// Not a link to either catalog
    Unrecognized,
}

impl LinkKind {
    /// Source catalog, if the link belongs to one.
    pub fn catalog(&self) -> Option<Catalog> {
        match self {
            Self::AppleSong | Self::AppleAlbumWithTrackIndex { .. } | Self::AppleOther => {
                Some(Catalog::AppleMusic)
            }
            Self::SpotifyTrack { .. } | Self::SpotifyOther => Some(Catalog::Spotify),
            Self::Unrecognized => None,
        }
    }

    /// Whether the link belongs to a supported catalog at all.
    pub fn is_known_catalog(&self) -> bool {
        self.catalog().is_some()
    }

    /// Whether the pipeline accepts this link as input.
    pub fn is_resolvable(&self) -> bool {
        matches!(
            self,
            Self::AppleSong | Self::AppleAlbumWithTrackIndex { .. } | Self::SpotifyTrack { .. }
        )
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AppleSong => f.write_str("Apple Music song"),
            Self::AppleAlbumWithTrackIndex { track_id } => {
                write!(f, "Apple Music album track (i={track_id})")
            }
            Self::AppleOther => f.write_str("Apple Music (not a song)"),
            Self::SpotifyTrack { track_id } => write!(f, "Spotify track ({track_id})"),
            Self::SpotifyOther => f.write_str("Spotify (not a track)"),
            Self::Unrecognized => f.write_str("unrecognized"),
        }
    }
}

/// Normalized (artist, title) identity of one track.
///
/// Two refs are "the same" only by string equality after normalization,
/// which is lossy by nature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackRef {
    pub artist: String,
    pub title: String,
}

impl TrackRef {
    /// Normalize both sides; `None` if either ends up empty.
    pub fn normalized(artist: &str, title: &str) -> Option<Self> {
        let artist = normalize_artist(artist);
        let title = normalize_title(title);
        if artist.is_empty() || title.is_empty() {
            return None;
        }
        Some(Self { artist, title })
    }

    /// "{artist} {title}" with query noise removed.
    pub fn query(&self) -> String {
        self.query_artist_first()
    }

    /// "{artist} {title}" search ordering.
    pub fn query_artist_first(&self) -> String {
        join_terms(&self.artist, &self.title)
    }

    /// "{title} {artist}" search ordering.
    pub fn query_title_first(&self) -> String {
        join_terms(&self.title, &self.artist)
    }
}

fn join_terms(first: &str, second: &str) -> String {
    format!(
        "{} {}",
        normalize_query_term(first),
        normalize_query_term(second)
    )
    .trim()
    .to_string()
}

impl fmt::Display for TrackRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.artist, self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_rejects_empty_side() {
        assert!(TrackRef::normalized("  ", "Title").is_none());
        assert!(TrackRef::normalized("Artist", "\u{200B}").is_none());
    }

    #[test]
    fn test_normalized_cleans_both_sides() {
        let track = TrackRef::normalized("The Weeknd on Apple Music", "«Blinding Lights»").unwrap();
        assert_eq!(track.artist, "The Weeknd");
        assert_eq!(track.title, "Blinding Lights");
    }

    #[test]
    fn test_query_orderings() {
        let track = TrackRef {
            artist: "Daft Punk".to_string(),
            title: "One More Time".to_string(),
        };
        assert_eq!(track.query_artist_first(), "Daft Punk One More Time");
        assert_eq!(track.query_title_first(), "One More Time Daft Punk");
        assert_eq!(track.query(), track.query_artist_first());
    }

    #[test]
    fn test_link_kind_resolvable() {
        assert!(LinkKind::AppleSong.is_resolvable());
        assert!(
            LinkKind::SpotifyTrack {
                track_id: "abc".to_string()
            }
            .is_resolvable()
        );
        assert!(!LinkKind::AppleOther.is_resolvable());
        assert!(!LinkKind::SpotifyOther.is_resolvable());
        assert!(!LinkKind::Unrecognized.is_resolvable());
        assert!(!LinkKind::Unrecognized.is_known_catalog());
    }

    #[test]
    fn test_catalog_opposite() {
        assert_eq!(Catalog::Spotify.opposite(), Catalog::AppleMusic);
        assert_eq!(Catalog::AppleMusic.opposite(), Catalog::Spotify);
    }
}
