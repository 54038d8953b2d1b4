//! Contact extraction from page content
//!
//! Emails and phone numbers are found in two ways:
//! - pattern matching over the raw page content (text and markup alike)
//! - scraping `mailto:` and `tel:` anchors, when enabled
//!
//! The patterns are intentionally loose and are kept exactly as they are:
//! the email TLD must be lowercase (so `user@Example.COM` is missed), and any
//! run of digits and separators of nine or more characters counts as a phone
//! number (so ISO dates such as `2024-01-15` match as well).

use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-z]{2,}").expect("valid email pattern")
});

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\+?[0-9][0-9\s().-]{7,}[0-9]").expect("valid phone pattern")
});

/// Options controlling which link schemes are scraped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Scrape `tel:` anchors
    pub include_tel: bool,

    /// Scrape `mailto:` anchors
    pub include_mailto: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            include_tel: true,
            include_mailto: true,
        }
    }
}

/// Deduplicated contact values, in the order they were first seen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contacts {
    pub emails: Vec<String>,
    pub phones: Vec<String>,
}

impl Contacts {
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.phones.is_empty()
    }
}

/// Extracts contacts from page content
///
/// # Arguments
///
/// * `content` - The page content (HTML or plain text)
/// * `options` - Which link schemes to scrape in addition to the patterns
///
/// # Example
///
/// ```
/// use sumi_trawl::crawler::{extract_contacts, ExtractOptions};
///
/// let html = r#"<p>Write to contact@example.com</p>
///               <a href="mailto:info@example.com">Mail us</a>"#;
/// let contacts = extract_contacts(html, &ExtractOptions::default());
/// assert_eq!(contacts.emails, vec!["contact@example.com", "info@example.com"]);
/// ```
pub fn extract_contacts(content: &str, options: &ExtractOptions) -> Contacts {
    if options.include_mailto || options.include_tel {
        let document = Html::parse_document(content);
        extract_from_document(content, &document, options)
    } else {
        pattern_contacts(content)
    }
}

/// Extracts contacts using an already parsed document for the link scraping
pub(crate) fn extract_from_document(
    content: &str,
    document: &Html,
    options: &ExtractOptions,
) -> Contacts {
    let mut contacts = pattern_contacts(content);

    // Link scraping is best effort; pattern results stand on their own
    if let Err(e) = scrape_link_schemes(document, options, &mut contacts) {
        tracing::debug!("Skipping link scheme scraping: {}", e);
    }

    contacts
}

fn pattern_contacts(content: &str) -> Contacts {
    let mut collector = Collector::default();

    for m in EMAIL_PATTERN.find_iter(content) {
        collector.email(m.as_str());
    }
    for m in PHONE_PATTERN.find_iter(content) {
        collector.phone(m.as_str());
    }

    collector.into_contacts()
}

fn scrape_link_schemes(
    document: &Html,
    options: &ExtractOptions,
    contacts: &mut Contacts,
) -> Result<(), String> {
    let mailto = if options.include_mailto {
        scheme_values(document, "mailto:")?
    } else {
        Vec::new()
    };
    let tel = if options.include_tel {
        scheme_values(document, "tel:")?
    } else {
        Vec::new()
    };

    let mut collector = Collector::from_contacts(std::mem::take(contacts));
    for value in mailto.into_iter().filter(|value| value.contains('@')) {
        collector.email(value);
    }
    for value in tel {
        collector.phone(value);
    }

    *contacts = collector.into_contacts();
    Ok(())
}

/// Collects the trimmed, scheme-stripped, non-empty hrefs of anchors using `scheme`
fn scheme_values<'a>(document: &'a Html, scheme: &str) -> Result<Vec<&'a str>, String> {
    let selector = Selector::parse(&format!("a[href^='{}']", scheme))
        .map_err(|e| format!("invalid selector for {}: {:?}", scheme, e))?;

    Ok(document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| strip_scheme(href, scheme))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .collect())
}

fn strip_scheme<'a>(href: &'a str, scheme: &str) -> Option<&'a str> {
    let prefix = href.get(..scheme.len())?;
    if prefix.eq_ignore_ascii_case(scheme) {
        href.get(scheme.len()..)
    } else {
        None
    }
}

#[derive(Default)]
struct Collector {
    contacts: Contacts,
    seen_emails: HashSet<String>,
    seen_phones: HashSet<String>,
}

impl Collector {
    fn from_contacts(contacts: Contacts) -> Self {
        Self {
            seen_emails: contacts.emails.iter().cloned().collect(),
            seen_phones: contacts.phones.iter().cloned().collect(),
            contacts,
        }
    }

    fn email(&mut self, value: &str) {
        if self.seen_emails.insert(value.to_string()) {
            self.contacts.emails.push(value.to_string());
        }
    }

    fn phone(&mut self, value: &str) {
        if self.seen_phones.insert(value.to_string()) {
            self.contacts.phones.push(value.to_string());
        }
    }

    fn into_contacts(self) -> Contacts {
        self.contacts
    }
}
