//! Spotify track extraction.
//!
//! Order: the public oEmbed endpoint first (small JSON, rarely blocked),
//! then two HTML renderings of the track: the localized player page and
//! the minimal embed page. Each rendering is read meta tags first, then
//! the embedded `__NEXT_DATA__` payload, then `<title>`.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::html::Page;
use super::json::{find_object, str_field};
use super::{ExtractionStrategy, PageSource, PageStrategy};
use crate::classify::spotify_track_id;
use crate::error::FetchError;
use crate::http::{Fetch, get_json};
use crate::model::TrackRef;
use crate::text::{TitleStyle, normalize_artist, normalize_title, split_dash, split_title_artist};

const OEMBED_URL: &str = "https://open.spotify.com/oembed";

/// oEmbed response, only the fields we read.
///
/// ```json
/// {"title": "Blinding Lights", "author_name": "The Weeknd", "type": "rich", ...}
/// ```
#[derive(Debug, Deserialize)]
struct OEmbed {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    author_name: Option<String>,
}

static DESCRIPTION_PREAMBLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*Listen to .*? on Spotify\.\s*").unwrap());

static DESCRIPTION_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[·|•]\s*|\s+[-–—]\s+").unwrap());

static PAGE_SOURCES: &[(&str, PageSource)] = &[
    ("og:title", from_og_title),
    ("og:description+title", from_description_and_title),
    ("__NEXT_DATA__", from_next_data),
    ("<title>", from_title_tag),
];

/// The Spotify chain, in priority order.
pub fn strategies() -> Vec<Box<dyn ExtractionStrategy>> {
    vec![
        Box::new(OEmbedStrategy),
        Box::new(PageStrategy::new("player page", player_page_url, PAGE_SOURCES)),
        Box::new(PageStrategy::new("embed page", embed_page_url, PAGE_SOURCES)),
    ]
}

fn player_page_url(url: &str) -> Option<String> {
    let id = spotify_track_id(url)?;
    Some(format!("https://open.spotify.com/track/{id}?locale=en"))
}

fn embed_page_url(url: &str) -> Option<String> {
    let id = spotify_track_id(url)?;
    Some(format!(
        "https://open.spotify.com/embed/track/{id}?utm_source=oembed"
    ))
}

/// Public oEmbed metadata endpoint.
struct OEmbedStrategy;

#[async_trait]
impl ExtractionStrategy for OEmbedStrategy {
    fn name(&self) -> &'static str {
        "oEmbed"
    }

    async fn extract(&self, fetch: &dyn Fetch, url: &str) -> Result<Option<TrackRef>, FetchError> {
        let endpoint = format!("{OEMBED_URL}?url={}", urlencoding::encode(url));
        let oembed: OEmbed = get_json(fetch, &endpoint).await?;
        Ok(from_oembed(&oembed))
    }
}

/// Pattern split of the title, unless it contradicts `author_name`.
///
/// Plain titles like "Stand by Me" or "Hello - Remastered 2019" match the
/// split patterns too; when an author is present the split must name them.
fn from_oembed(oembed: &OEmbed) -> Option<TrackRef> {
    let title = oembed.title.as_deref().unwrap_or_default();
    let split = split_title_artist(title, TitleStyle::Spotify);
    let author = oembed
        .author_name
        .as_deref()
        .map(normalize_artist)
        .filter(|a| !a.is_empty());

    match (split, author) {
        (Some(track), None) => Some(track),
        (Some(track), Some(author)) if same_artist(&track.artist, &author) => Some(track),
        (_, Some(author)) => TrackRef::normalized(&author, title),
        (None, None) => None,
    }
}

fn same_artist(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn og_title(page: &Page) -> Option<&str> {
    page.meta(&["og:title", "twitter:title"])
}

fn split_spotify(text: &str) -> Option<TrackRef> {
    split_title_artist(text, TitleStyle::Spotify).or_else(|| split_dash(text))
}

fn from_og_title(page: &Page, _url: &str) -> Option<TrackRef> {
    split_spotify(og_title(page)?)
}

/// Title from og:title, artist guessed from the description.
///
/// Descriptions look like "Listen to X on Spotify. Song · Artist · 2020"
/// or "Artist · Song · 2020".
fn from_description_and_title(page: &Page, _url: &str) -> Option<TrackRef> {
    let title = og_title(page)?;
    let description = page.meta(&["og:description", "description"])?;

    let description = DESCRIPTION_PREAMBLE.replace(description, "");
    let artist = DESCRIPTION_SEPARATOR
        .split(&description)
        .map(str::trim)
        .find(|segment| !is_description_filler(segment))?;

    let title = split_dash(title).map_or_else(|| normalize_title(title), |t| t.title);
    TrackRef::normalized(artist, &title)
}

fn is_description_filler(segment: &str) -> bool {
    segment.is_empty()
        || segment.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        || ["song", "single", "ep", "album"]
            .iter()
            .any(|w| segment.eq_ignore_ascii_case(w))
}

fn from_next_data(page: &Page, url: &str) -> Option<TrackRef> {
    let track_id = spotify_track_id(url)?;
    page.scripts_with("__next_data__").find_map(|body| {
        let data: Value = serde_json::from_str(body).ok()?;
        find_track_node(&data, &track_id)
    })
}

fn from_title_tag(page: &Page, _url: &str) -> Option<TrackRef> {
    split_spotify(page.title()?)
}

/// Locate the requested track in embedded page data.
///
/// A node whose `uri` is exactly `spotify:track:<id>` wins; otherwise the
/// first `"type": "track"` node that does not name a different track.
fn find_track_node(data: &Value, track_id: &str) -> Option<TrackRef> {
    let uri = format!("spotify:track:{track_id}");

    find_object(data, &mut |obj| {
        (str_field(obj, "uri") == Some(uri.as_str()))
            .then(|| track_from_node(obj))
            .flatten()
    })
    .or_else(|| {
        find_object(data, &mut |obj| {
            let is_track = str_field(obj, "type") == Some("track");
            let other_uri = str_field(obj, "uri").is_some_and(|u| u != uri);
            let other_id = str_field(obj, "id").is_some_and(|id| id != track_id);
            (is_track && !other_uri && !other_id)
                .then(|| track_from_node(obj))
                .flatten()
        })
    })
}

fn track_from_node(obj: &Map<String, Value>) -> Option<TrackRef> {
    let name = str_field(obj, "name")?;
    let artist = first_artist_name(obj)?;
    TrackRef::normalized(artist, name)
}

/// `artists: [{name}]`, `artists: {items: [{profile: {name}}]}` and similar.
fn first_artist_name(obj: &Map<String, Value>) -> Option<&str> {
    let artists = obj.get("artists")?;
    let list = match artists {
        Value::Array(items) => items,
        Value::Object(inner) => inner.get("items")?.as_array()?,
        _ => return None,
    };
    list.iter().filter_map(Value::as_object).find_map(|artist| {
        str_field(artist, "name").or_else(|| {
            artist
                .get("profile")
                .and_then(Value::as_object)
                .and_then(|p| str_field(p, "name"))
        })
    })
}
