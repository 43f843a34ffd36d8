// src/checker/html.rs
// =============================================================================
// This module extracts links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// We also use the `url` crate to:
// - Resolve relative hrefs against the page URL
// - Check the scheme and drop the fragment
//
// Extraction is pure: no network I/O, and the same (html, base_url) always
// gives the same set of links.
// =============================================================================

use std::collections::BTreeSet;

use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

// Extracts all checkable links from HTML content
//
// Parameters:
//   html: the HTML content to parse
//   base_url: the URL of the page (for resolving relative links)
//
// Returns: the set of absolute http/https URLs found, fragments stripped.
// A BTreeSet keeps the output deduplicated and in a stable order.
//
// Example:
//   html = "<a href='/docs#intro'>Docs</a>"
//   base_url = "https://example.com"
//   result = {"https://example.com/docs"}
pub fn extract_html_links(html: &str, base_url: &str) -> BTreeSet<String> {
    let mut links = BTreeSet::new();

    let base = match Url::parse(base_url) {
        Ok(url) => url,
        Err(e) => {
            // Without a base we can't resolve relative links
            debug!("invalid base URL {base_url}: {e}");
            return links;
        }
    };

    let document = Html::parse_document(html);

    // "a[href]" is a constant selector, parsing it cannot fail in practice
    let Ok(selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href") {
            if let Some(absolute_url) = resolve_url(&base, href) {
                links.insert(absolute_url);
            }
        }
    }

    links
}

// Resolves a possibly-relative href to an absolute, fragment-free URL
//
// Returns None for:
// - fragment-only hrefs ("#section") - they point back at the same page
// - javascript: pseudo-links
// - anything that doesn't resolve to http/https (mailto:, tel:, data:, ...)
// - hrefs that don't parse at all
//
// Examples:
//   base = "https://example.com/page"
//   href = "/docs"              -> Some("https://example.com/docs")
//   href = "../other#top"       -> Some("https://example.com/other")
//   href = "https://other.com"  -> Some("https://other.com/")
//   href = "javascript:void(0)" -> None
fn resolve_url(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') || href.to_ascii_lowercase().starts_with("javascript:") {
        return None;
    }

    // join() handles both cases: absolute hrefs replace the base entirely,
    // relative ones are resolved against it
    let mut url = base.join(href).ok()?;

    if !is_checkable_scheme(&url) {
        return None;
    }

    url.set_fragment(None);
    Some(url.to_string())
}

// Only HTTP/HTTPS links can be checked with HEAD/GET requests
pub(crate) fn is_checkable_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why strip fragments?
//    - "page#a" and "page#b" are the same document to an HTTP server
//    - Stripping them makes the URL string a good deduplication key
//
// 2. Why no other normalization?
//    - "https://a.test/x" and "https://a.test/x/" can be different resources
//    - We compare URLs as exact strings after fragment stripping
//
// 3. What does Url::to_string() do to the input?
//    - The url crate serializes a parsed URL in canonical WHATWG form
//    - e.g. "https://www.rust-lang.org" becomes "https://www.rust-lang.org/"
// -----------------------------------------------------------------------------
