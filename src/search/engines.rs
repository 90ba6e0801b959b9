//! External web search engines scoped to Spotify track pages.
//!
//! Each engine knows how to build a results-page URL and how to pull the
//! first Spotify track link out of that page. Result markup changes without
//! notice, so matching is deliberately loose: every `href` on the page is
//! considered and the first one shaped like a track URL wins.

use std::sync::LazyLock;

use regex::Regex;
use url::form_urlencoded;

use crate::extract::html::decode_entities;

static HREF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(?i)href\s*=\s*"([^"]+)""#).unwrap());

static SPOTIFY_TRACK_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://open\.spotify\.com/(?:intl-[a-z]{2}(?:-[a-z]{2})?/)?track/([A-Za-z0-9]+)")
        .unwrap()
});

/// A search engine results page we can scrape.
pub trait WebSearchEngine: Send + Sync {
    /// Short name for logs and config.
    fn name(&self) -> &'static str;

    /// Results-page URL for `query`.
    fn search_url(&self, query: &str) -> String;

    /// First Spotify track link on a results page, canonicalized.
    fn extract_link(&self, html: &str) -> Option<String>;
}

/// DuckDuckGo's HTML endpoint. Result links are redirect-wrapped
/// (`//duckduckgo.com/l/?uddg=<encoded target>`) and must be unwrapped.
pub struct DuckDuckGo;

impl WebSearchEngine for DuckDuckGo {
    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    fn search_url(&self, query: &str) -> String {
        format!("https://html.duckduckgo.com/html/?q={}", urlencoding::encode(query))
    }

    fn extract_link(&self, html: &str) -> Option<String> {
        hrefs(html).find_map(|href| spotify_track_link(&unwrap_redirect(&href)))
    }
}

pub struct Brave;

impl WebSearchEngine for Brave {
    fn name(&self) -> &'static str {
        "brave"
    }

    fn search_url(&self, query: &str) -> String {
        format!("https://search.brave.com/search?q={}", urlencoding::encode(query))
    }

    fn extract_link(&self, html: &str) -> Option<String> {
        hrefs(html).find_map(|href| spotify_track_link(&href))
    }
}

pub struct Bing;

impl WebSearchEngine for Bing {
    fn name(&self) -> &'static str {
        "bing"
    }

    fn search_url(&self, query: &str) -> String {
        format!("https://www.bing.com/search?q={}", urlencoding::encode(query))
    }

    fn extract_link(&self, html: &str) -> Option<String> {
        hrefs(html).find_map(|href| spotify_track_link(&href))
    }
}

/// Engine by config name.
pub fn engine_by_name(name: &str) -> Option<Box<dyn WebSearchEngine>> {
    match name.trim().to_ascii_lowercase().as_str() {
        "duckduckgo" | "ddg" => Some(Box::new(DuckDuckGo)),
        "brave" => Some(Box::new(Brave)),
        "bing" => Some(Box::new(Bing)),
        _ => None,
    }
}

/// DuckDuckGo, Brave, Bing.
pub fn default_engines() -> Vec<Box<dyn WebSearchEngine>> {
    vec![Box::new(DuckDuckGo), Box::new(Brave), Box::new(Bing)]
}

/// Canonical `https://open.spotify.com/track/<id>` if `candidate` is a track URL.
pub fn spotify_track_link(candidate: &str) -> Option<String> {
    let caps = SPOTIFY_TRACK_URL.captures(candidate.trim())?;
    Some(format!("https://open.spotify.com/track/{}", &caps[1]))
}

fn hrefs(html: &str) -> impl Iterator<Item = String> + '_ {
    HREF.captures_iter(html).map(|c| decode_entities(&c[1]))
}

/// Target of a `...?uddg=<target>` redirect link; other links pass through.
fn unwrap_redirect(href: &str) -> String {
    href.split_once('?')
        .and_then(|(_, query)| {
            form_urlencoded::parse(query.as_bytes())
                .find(|(k, _)| k == "uddg")
                .map(|(_, v)| v.into_owned())
        })
        .filter(|target| !target.is_empty())
        .unwrap_or_else(|| href.to_string())
}
