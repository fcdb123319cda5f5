//! URL handling module for Ripple-Stack
//!
//! This module provides the normalized URL type used to tag stack entries,
//! along with normalization and domain extraction helpers.

mod domain;
mod normalize;

use crate::stack::AdderKey;
use crate::UrlError;
use std::fmt;
use std::str::FromStr;
use url::Url;

// Re-export main functions
pub use domain::extract_domain;
pub use normalize::normalize_url;

/// A normalized crawl URL
///
/// Two `CrawlUrl`s are equal when their normalized forms are equal, so
/// `https://WWW.Example.com/a/` and `https://example.com/a#top` name the same
/// page. A `CrawlUrl` always has an http(s) scheme and a host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CrawlUrl(Url);

impl CrawlUrl {
    /// Parses and normalizes a URL string
    pub fn parse(url_str: &str) -> Result<Self, UrlError> {
        normalize_url(url_str).map(Self)
    }

    /// The lowercase host of this URL
    pub fn domain(&self) -> &str {
        // Normalization guarantees a host
        self.0.host_str().unwrap_or_default()
    }

    /// The normalized URL as a string slice
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Consumes the wrapper, returning the normalized URL
    pub fn into_inner(self) -> Url {
        self.0
    }
}

impl TryFrom<Url> for CrawlUrl {
    type Error = UrlError;

    fn try_from(url: Url) -> Result<Self, Self::Error> {
        Self::parse(url.as_str())
    }
}

impl FromStr for CrawlUrl {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<Url> for CrawlUrl {
    fn as_ref(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for CrawlUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl AdderKey for CrawlUrl {
    fn is_unset(&self) -> bool {
        self.domain().is_empty()
    }
}
