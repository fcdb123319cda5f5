//! Link discovery for the walker
//!
//! Fetching and parsing pages is outside this crate; the walker only needs
//! to know the outgoing links of a page. `LinkMap` serves them from memory.

use crate::config::LinkEntry;
use crate::url::CrawlUrl;
use crate::UrlError;
use std::collections::HashMap;

/// Source of outgoing links for a page
pub trait LinkSource: Send + Sync {
    /// Returns the links found on `url`, in document order
    fn links(&self, url: &CrawlUrl) -> Vec<CrawlUrl>;
}

/// An offline link map keyed by normalized URL
#[derive(Debug, Clone, Default)]
pub struct LinkMap {
    links: HashMap<CrawlUrl, Vec<CrawlUrl>>,
}

impl LinkMap {
    /// Creates an empty link map
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a link map from configuration entries
    ///
    /// Entries naming the same page (after normalization) are merged.
    pub fn from_entries(entries: &[LinkEntry]) -> Result<Self, UrlError> {
        let mut map = Self::new();
        for entry in entries {
            let from = CrawlUrl::parse(&entry.from)?;
            let to = entry
                .to
                .iter()
                .map(|target| CrawlUrl::parse(target))
                .collect::<Result<Vec<_>, _>>()?;
            map.insert(from, to);
        }
        Ok(map)
    }

    /// Adds links from `from`, after any already known
    pub fn insert(&mut self, from: CrawlUrl, to: Vec<CrawlUrl>) {
        self.links.entry(from).or_default().extend(to);
    }

    /// Number of pages with known links
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns true if no page has known links
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl LinkSource for LinkMap {
    fn links(&self, url: &CrawlUrl) -> Vec<CrawlUrl> {
        self.links.get(url).cloned().unwrap_or_default()
    }
}
