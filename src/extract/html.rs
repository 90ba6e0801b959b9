//! Markup helpers for catalog pages.
//!
//! Catalog pages are scraped with narrow regexes rather than a DOM: only
//! `<meta>` tags, the `<title>` element and a few `<script>` payloads are
//! ever read. Attribute values are entity-decoded.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static META_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<meta\s[^>]*>").unwrap());

static META_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\b(?:property|name)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

static META_CONTENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\bcontent\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

static TITLE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>([^<]+)</title>").unwrap());

static SCRIPT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script([^>]*)>(.*?)</script>").unwrap());

static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").unwrap());

/// A fetched page with its meta tags and title pre-extracted.
#[derive(Debug, Clone)]
pub struct Page {
    html: String,
    meta: HashMap<String, String>,
    title: Option<String>,
}

impl Page {
    pub fn parse(html: String) -> Self {
        let meta = meta_tags(&html);
        let title = TITLE_TAG
            .captures(&html)
            .map(|c| decode_entities(c[1].trim()))
            .filter(|t| !t.is_empty());
        Self { html, meta, title }
    }

    /// First non-empty meta value among `keys` (lowercase property/name).
    pub fn meta(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .filter_map(|k| self.meta.get(*k))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
    }

    /// The `<title>` element text.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Bodies of `<script>` elements whose opening tag contains `marker`.
    pub fn scripts_with<'a>(&'a self, marker: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        let marker = marker.to_ascii_lowercase();
        SCRIPT_TAG.captures_iter(&self.html).filter_map(move |c| {
            let attrs = c.get(1)?.as_str().to_ascii_lowercase();
            let body = c.get(2)?.as_str();
            attrs.contains(&marker).then_some(body)
        })
    }
}

/// Collect `<meta property|name=… content=…>` pairs. Keys are lowercased;
/// the first occurrence of a key wins.
pub fn meta_tags(html: &str) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for tag in META_TAG.find_iter(html) {
        let tag = tag.as_str();
        let Some(key) = first_group(&META_KEY, tag) else {
            continue;
        };
        let Some(value) = first_group(&META_CONTENT, tag) else {
            continue;
        };
        out.entry(key.trim().to_ascii_lowercase())
            .or_insert_with(|| decode_entities(value));
    }
    out
}

fn first_group<'a>(re: &Regex, text: &'a str) -> Option<&'a str> {
    let caps = re.captures(text)?;
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str())
}

/// Decode the HTML entities that show up in catalog titles.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    ENTITY
        .replace_all(s, |caps: &regex::Captures<'_>| {
            let entity = &caps[1];
            decode_entity(entity).map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn decode_entity(entity: &str) -> Option<char> {
    if let Some(num) = entity.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse().ok()?,
        };
        return char::from_u32(code);
    }
    Some(match entity {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{00A0}',
        "laquo" => '«',
        "raquo" => '»',
        "ldquo" => '“',
        "rdquo" => '”',
        "lsquo" => '‘',
        "rsquo" => '’',
        "ndash" => '–',
        "mdash" => '—',
        "middot" => '·',
        "bull" => '•',
        _ => return None,
    })
}
