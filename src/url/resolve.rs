use url::Url;

/// Resolves a link href to an absolute URL
///
/// Returns None if the link should be excluded:
/// - empty hrefs
/// - javascript:, mailto:, tel:, data: schemes
/// - hrefs that do not resolve against the base URL
/// - non-HTTP(S) URLs after resolution
///
/// The resolved URL is returned as serialized by the `url` crate, fragment
/// included; no further normalization is applied.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_trawl::url::resolve_link;
///
/// let base = Url::parse("https://example.com/team/").unwrap();
/// assert_eq!(
///     resolve_link("alice", &base),
///     Some("https://example.com/team/alice".to_string())
/// );
/// assert_eq!(resolve_link("mailto:a@example.com", &base), None);
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
