//! Text normalization for artist and title strings.
//!
//! Catalog pages pad their titles with invisible characters, brand names,
//! label prefixes and decorative quotes. These functions strip that noise so
//! the same recording produces the same query on both sides.
//!
//! All functions are total and idempotent. The title and artist normalizers
//! run their single pass to a fixpoint, so nested noise ("Title: Song: X")
//! is removed completely and a second call is always a no-op.

use std::sync::LazyLock;

use regex::Regex;

/// Quote marks that decorate titles on catalog pages.
const DECORATIVE_QUOTES: &[char] = &['«', '»', '“', '”', '„', '"'];

static LEADING_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)^(?:песня|трек|сингл|название|song|track|single|title|titel)\s*(?:[:\-–—]\s*[«"“]?|[«"“])"#,
    )
    .unwrap()
});

static APPLE_MUSIC_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:on\s+)?Apple\s*Music\b").unwrap());

static TRAILING_PLATFORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\s*[|\-–—]\s*|\s+on\s+)(?:Apple\s*Music|Spotify)\s*$").unwrap()
});

static TRAILING_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[—–\-|·•]\s*$").unwrap());

const EDITION_WORDS: &str = r"live|remaster(?:ed)?|deluxe(?:\s+edition)?|radio\s+edit|mono|stereo|(?:single|album|radio|mono|stereo)\s+version|explicit|acoustic|demo|bonus\s+track|anniversary(?:\s+edition)?|expanded(?:\s+edition)?";

static PAREN_EDITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\s*[(\[][^()\[\]]*\b(?:{EDITION_WORDS})\b[^()\[\]]*[)\]]\s*$"
    ))
    .unwrap()
});

static DASH_EDITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\s+[-–—]\s+(?:[^-–—]*\s)?(?:{EDITION_WORDS})\b[^-–—]*$"
    ))
    .unwrap()
});

/// Remove zero-width and bidi-control characters and collapse whitespace.
pub fn normalize_whitespace_and_controls(s: &str) -> String {
    let visible: String = s.chars().filter(|c| !is_invisible(*c)).collect();
    collapse_whitespace(&visible)
}

/// Normalize a track title for cross-catalog search.
///
/// Strips a leading label ("Song:", "Трек —"), platform suffixes, enclosing
/// quotes and trailing edition tags such as "(Live)" or "- Remastered 2019".
pub fn normalize_title(raw: &str) -> String {
    to_fixpoint(raw, title_pass)
}

/// Normalize an artist name: drops "Apple Music" mentions and trailing separators.
pub fn normalize_artist(raw: &str) -> String {
    to_fixpoint(raw, artist_pass)
}

/// Normalize a single search term: control characters, brand mentions and all
/// quote marks are removed.
pub fn normalize_query_term(s: &str) -> String {
    let s = normalize_whitespace_and_controls(s);
    let s = APPLE_MUSIC_MENTION.replace_all(&s, "");
    let s: String = s.chars().filter(|c| !DECORATIVE_QUOTES.contains(c)).collect();
    collapse_whitespace(&s)
}

fn title_pass(s: &str) -> String {
    let s = normalize_whitespace_and_controls(s);
    let s = LEADING_LABEL.replace(&s, "");
    let s = TRAILING_PLATFORM.replace(&s, "");
    let s = trim_quotes(&s);
    let s = strip_edition_suffix(&s);
    collapse_whitespace(&s)
}

fn artist_pass(s: &str) -> String {
    let s = normalize_whitespace_and_controls(s);
    let s = APPLE_MUSIC_MENTION.replace_all(&s, "");
    let s = TRAILING_PLATFORM.replace(&s, "");
    let s = TRAILING_SEPARATOR.replace(&s, "");
    let s = trim_quotes(&s);
    collapse_whitespace(&s)
}

/// Drop one trailing edition tag, unless it is the whole title.
fn strip_edition_suffix(s: &str) -> String {
    for re in [&*PAREN_EDITION, &*DASH_EDITION] {
        if let Some(m) = re.find(s) {
            let head = s[..m.start()].trim();
            if !head.is_empty() {
                return head.to_string();
            }
        }
    }
    s.to_string()
}

fn trim_quotes(s: &str) -> String {
    s.trim()
        .trim_matches(|c| DECORATIVE_QUOTES.contains(&c))
        .trim()
        .to_string()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Apply `pass` until the output stops changing.
///
/// Every pass only removes characters (after the first has normalized
/// whitespace), so the loop terminates.
fn to_fixpoint(raw: &str, pass: fn(&str) -> String) -> String {
    let mut current = pass(raw);
    loop {
        let next = pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn is_invisible(c: char) -> bool {
    matches!(c,
        '\u{200B}'..='\u{200F}'   // zero-width space/joiners, LRM, RLM
        | '\u{202A}'..='\u{202E}' // bidi embeddings and overrides
        | '\u{2060}'..='\u{2064}' // word joiner, invisible operators
        | '\u{2066}'..='\u{2069}' // bidi isolates
        | '\u{061C}'              // arabic letter mark
        | '\u{00AD}'              // soft hyphen
        | '\u{FEFF}'              // BOM / zero-width no-break space
    )
}
