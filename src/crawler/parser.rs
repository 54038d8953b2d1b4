//! HTML parser for discovering links to follow
//!
//! Every `<a href>` on a page is resolved against the page URL, in the order
//! the anchors appear in the markup. Scope filtering is left to the caller.

use crate::url::resolve_link;
use scraper::{Html, Selector};
use url::Url;

/// Discovers all followable links in an HTML page
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `page_url` - The URL the page was fetched from, for resolving relative links
///
/// # Returns
///
/// Absolute URLs in markup order. Duplicates are kept; the frontier decides
/// what is worth queueing.
///
/// # Example
///
/// ```
/// use sumi_trawl::crawler::discover_links;
/// use url::Url;
///
/// let html = r#"<a href="/team">Team</a><a href="mailto:x@example.com">Mail</a>"#;
/// let page = Url::parse("https://example.com/").unwrap();
/// assert_eq!(discover_links(html, &page), vec!["https://example.com/team"]);
/// ```
pub fn discover_links(html: &str, page_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    links_from_document(&document, page_url)
}

/// Extracts links from an already parsed document
pub(crate) fn links_from_document(document: &Html, page_url: &Url) -> Vec<String> {
    let a_selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(e) => {
            tracing::warn!("Failed to build anchor selector: {:?}", e);
            return Vec::new();
        }
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, page_url))
        .collect()
}
