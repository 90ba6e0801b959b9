//! Test utilities and fixtures for tune-bridge tests.
//!
//! Builders for the catalog page shapes the extractors read, so tests state
//! only the parts they care about.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::html_page;
//!
//! let html = html_page(&[("og:title", "Hello - Adele")], Some("Hello"), "");
//! let fetch = MockFetch::new().route("https://music.apple.com/", &html);
//! ```

use crate::model::TrackRef;

/// Build a minimal HTML document.
///
/// `meta` pairs become `<meta property=… content=…>` tags, `title` the
/// `<title>` element, and `body` is inserted verbatim.
pub fn html_page(meta: &[(&str, &str)], title: Option<&str>, body: &str) -> String {
    let mut head = String::new();
    for (key, value) in meta {
        head.push_str(&format!(
            "<meta property=\"{key}\" content=\"{}\">\n",
            value.replace('"', "&quot;")
        ));
    }
    if let Some(title) = title {
        head.push_str(&format!("<title>{title}</title>\n"));
    }
    format!("<!DOCTYPE html><html><head>\n{head}</head><body>\n{body}\n</body></html>")
}

/// A `__NEXT_DATA__` script element carrying `data`.
pub fn next_data_script(data: &serde_json::Value) -> String {
    format!(r#"<script id="__NEXT_DATA__" type="application/json">{data}</script>"#)
}

/// A JSON-LD script element carrying `data`.
pub fn ld_json_script(data: &serde_json::Value) -> String {
    format!(r#"<script type="application/ld+json">{data}</script>"#)
}

/// A TrackRef without going through normalization.
pub fn track(artist: &str, title: &str) -> TrackRef {
    TrackRef {
        artist: artist.to_string(),
        title: title.to_string(),
    }
}

/// An iTunes Search/Lookup API body with the given result objects.
pub fn itunes_results(results: &[serde_json::Value]) -> String {
    serde_json::json!({
        "resultCount": results.len(),
        "results": results,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::html::Page;

    #[test]
    fn test_html_page_roundtrips_through_parser() {
        let page = Page::parse(html_page(
            &[("og:title", "Say \"Hi\"")],
            Some("T"),
            "",
        ));
        assert_eq!(page.meta(&["og:title"]), Some("Say \"Hi\""));
        assert_eq!(page.title(), Some("T"));
    }
}
