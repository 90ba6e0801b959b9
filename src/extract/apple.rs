//! Apple Music song extraction.
//!
//! One fetch of the song page, read in order: schema.org JSON-LD nodes,
//! the og:title meta tag, then `<title>`.

use serde::Deserialize;
use serde::de::IgnoredAny;
use serde_json::Value;

use super::html::Page;
use super::{ExtractionStrategy, PageSource, PageStrategy};
use crate::model::TrackRef;
use crate::text::{TitleStyle, split_title_artist};

/// The part of a `MusicRecording` node we read.
#[derive(Debug, Deserialize)]
struct LdNode {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "byArtist")]
    by_artist: Option<ByArtist>,
}

/// `byArtist` is a bare string, a `{name}` object, or a list of either.
/// Anything else (an `{"@id": ...}` reference) is kept but names nobody.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ByArtist {
    Name(String),
    Entity { name: String },
    Many(Vec<ByArtist>),
    Other(IgnoredAny),
}

impl ByArtist {
    fn first_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) | Self::Entity { name } => {
                Some(name.trim()).filter(|n| !n.is_empty())
            }
            Self::Many(items) => items.iter().find_map(Self::first_name),
            Self::Other(_) => None,
        }
    }
}

/// Top-level nodes of a JSON-LD body: a list, an `@graph`, or one object.
fn ld_nodes(document: Value) -> Vec<Value> {
    match document {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("@graph") {
            Some(Value::Array(items)) => items,
            _ => vec![Value::Object(obj)],
        },
        _ => Vec::new(),
    }
}

static PAGE_SOURCES: &[(&str, PageSource)] = &[
    ("ld+json", from_json_ld),
    ("og:title", from_og_title),
    ("<title>", from_title_tag),
];

/// The Apple Music chain: the song page itself.
pub fn strategies() -> Vec<Box<dyn ExtractionStrategy>> {
    vec![Box::new(PageStrategy::new(
        "song page",
        |url| Some(url.to_string()),
        PAGE_SOURCES,
    ))]
}

fn from_json_ld(page: &Page, _url: &str) -> Option<TrackRef> {
    page.scripts_with("application/ld+json").find_map(|body| {
        let document: Value = serde_json::from_str(body).ok()?;
        // Each node decodes on its own; a malformed one must not hide the rest.
        ld_nodes(document).into_iter().find_map(|node| {
            let node: LdNode = serde_json::from_value(node).ok()?;
            let name = node.name.as_deref()?;
            let artist = node.by_artist.as_ref()?.first_name()?;
            TrackRef::normalized(artist, name)
        })
    })
}

fn from_og_title(page: &Page, _url: &str) -> Option<TrackRef> {
    split_title_artist(page.meta(&["og:title"])?, TitleStyle::Apple)
}

fn from_title_tag(page: &Page, _url: &str) -> Option<TrackRef> {
    split_title_artist(page.title()?, TitleStyle::Apple)
}
