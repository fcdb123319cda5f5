use serde::Deserialize;

/// Main configuration structure for Ripple-Stack
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default, rename = "seed")]
    pub seeds: Vec<SeedEntry>,
    #[serde(default, rename = "link")]
    pub links: Vec<LinkEntry>,
}

/// Traversal behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum depth to crawl from seed URLs; also sizes the ancestor stack
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Number of concurrent walker tasks
    #[serde(default = "default_workers")]
    pub workers: u32,

    /// Consecutive off-domain hops allowed along one branch
    #[serde(rename = "max-offsite-hops", default = "default_max_offsite_hops")]
    pub max_offsite_hops: u32,
}

/// A page to start a traversal from
#[derive(Debug, Clone, Deserialize)]
pub struct SeedEntry {
    pub url: String,
}

/// Outgoing links of one page in the offline link map
#[derive(Debug, Clone, Deserialize)]
pub struct LinkEntry {
    /// The linking page
    pub from: String,

    /// Pages it links to, in document order
    #[serde(default)]
    pub to: Vec<String>,
}

fn default_workers() -> u32 {
    4
}

fn default_max_offsite_hops() -> u32 {
    1
}
