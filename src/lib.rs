//! Tune Bridge - convert track links between Apple Music and Spotify.
//!
//! Given one catalog's track link, the pipeline classifies it, extracts a
//! normalized (artist, title) pair from the catalog's public pages and
//! endpoints, then searches the opposite catalog for the same track.
//!
//! ```ignore
//! use std::sync::Arc;
//! use tune_bridge::{Resolver, ResolverConfig, http::{HttpClient, HttpSettings}};
//!
//! let client = HttpClient::new(&HttpSettings::default())?;
//! let resolver = Resolver::new(ResolverConfig::default(), Arc::new(client));
//! let link = resolver.resolve("https://open.spotify.com/track/...", "us").await;
//! ```

pub mod canonical;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod http;
pub mod itunes;
pub mod model;
pub mod resolver;
pub mod search;
pub mod text;
#[cfg(test)]
pub mod test_utils;

pub use classify::classify;
pub use error::{Error, FetchError};
pub use model::{Catalog, LinkKind, TrackRef};
pub use resolver::{Resolver, ResolverConfig};
