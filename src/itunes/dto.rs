//! iTunes Search API Data Transfer Objects
//!
//! These types match what the Search and Lookup endpoints return. Only the
//! fields the resolver reads are declared. Do not use these outside the
//! itunes module; the adapter turns them into plain URLs.
//!
//! Example response:
//! ```json
//! {
//!   "resultCount": 1,
//!   "results": [{
//!     "wrapperType": "track",
//!     "kind": "song",
//!     "trackId": 1488408568,
//!     "artistName": "The Weeknd",
//!     "trackName": "Blinding Lights",
//!     "trackViewUrl": "https://music.apple.com/us/album/blinding-lights/1488408555?i=1488408568&uo=4",
//!     "collectionViewUrl": "https://music.apple.com/us/album/after-hours/1488408555?uo=4"
//!   }]
//! }
//! ```

use serde::Deserialize;

/// Top-level response of both /search and /lookup
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<Item>,
}

/// One result entry (song, album or artist depending on `wrapperType`)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// "song", "music-video", ... (absent for collections)
    pub kind: Option<String>,
    pub track_view_url: Option<String>,
    pub collection_view_url: Option<String>,
}
