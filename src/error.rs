//! Error types for the link-resolution pipeline.
//!
//! Two layers, mirroring how failures flow through a resolution:
//!
//! - [`FetchError`]: a single HTTP step went wrong (network, status, timeout,
//!   unparsable body). Strategies surface it, chains log it and try the next
//!   strategy. It never reaches the caller on its own.
//! - [`Error`]: a whole stage gave up. Every variant is recoverable; the
//!   orchestrator turns all of them into "nothing found" for `resolve`, and
//!   [`Error::user_message`] gives the transport something to show.
//!
//! The binary wraps everything in `anyhow` at the top level.

use crate::model::LinkKind;

/// Pipeline result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Stage-level failure of a resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// No extraction strategy produced a usable (artist, title) pair
    #[error("Could not extract artist and title from {url}")]
    ExtractionFailed { url: String },

    /// Apple album-to-song lookup failed
    #[error("No canonical track URL for {url}")]
    CanonicalizationUnavailable { url: String },

    /// Every search backend was exhausted without a match
    #[error("No match found for \"{query}\"")]
    NotFound { query: String },

    /// The overall deadline was exceeded
    #[error("Resolution timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    /// The URL is not a resolvable single-track link
    #[error("Unsupported link ({kind:?}): {url}")]
    Unrecognized { kind: LinkKind, url: String },

    /// Configuration problem (bad HTTP client settings etc.)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Text the transport layer shows to a user for this outcome.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::ExtractionFailed { .. }
            | Self::CanonicalizationUnavailable { .. }
            | Self::NotFound { .. } => "No link found. Try another storefront.",
            Self::Timeout { .. } => "The search took too long. Please try again.",
            Self::Unrecognized { kind, .. } if kind.is_known_catalog() => {
                "This is not a single-track link. Send an Apple Music /song/ link \
                 (or an /album/ link with ?i=<trackId>) or a Spotify /track/ link."
            }
            Self::Unrecognized { .. } => "Supported catalogs are Apple Music and Spotify.",
            Self::Config(_) => "The resolver is misconfigured.",
        }
    }

    /// Whether the caller may reasonably retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Failure of one HTTP fetch inside a strategy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("Request timed out")]
    Timeout,

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if let Some(status) = e.status() {
            Self::Status(status.as_u16())
        } else if e.is_decode() {
            Self::Parse(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}
