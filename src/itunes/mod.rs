//! iTunes Search API integration
//!
//! Apple's public catalog API: song search (used to find Apple Music links)
//! and lookup by numeric ID (used to turn an album link with `?i=` into a
//! direct song link). No API key required.
//!
//! API docs: https://performance-partners.apple.com/search-api

pub mod dto;
mod adapter;
mod client;

pub use adapter::{first_result_url, pick_song_url, tidy_apple_url};
pub use client::{DEFAULT_STOREFRONT, ItunesClient};
