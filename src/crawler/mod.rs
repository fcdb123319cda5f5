//! Crawler module for depth-first traversal
//!
//! This module contains the traversal logic that shares one ancestor stack
//! between concurrent workers, including:
//! - Link discovery through the `LinkSource` trait
//! - Branch policies that decide what ancestor state to push
//! - The depth-first walker and its report

mod links;
mod policy;
mod walker;

pub use links::{LinkMap, LinkSource};
pub use policy::{BranchPolicy, BranchState, OffsiteHopPolicy};
pub use walker::{PageVisit, WalkReport, Walker};

use crate::config::Config;
use crate::url::CrawlUrl;
use crate::RippleError;

/// Runs a complete walk described by a configuration
///
/// This is the main entry point for a walk. It will:
/// 1. Build the link map from the `[[link]]` entries
/// 2. Normalize the seed URLs
/// 3. Size the ancestor stack for `max-depth`
/// 4. Walk with the off-site hop policy and the configured worker count
///
/// # Returns
///
/// * `Ok(WalkReport)` - The walk finished
/// * `Err(RippleError)` - The configuration could not be turned into a walk
pub async fn walk(config: &Config) -> Result<WalkReport, RippleError> {
    let links = LinkMap::from_entries(&config.links)?;
    let seeds = config
        .seeds
        .iter()
        .map(|seed| CrawlUrl::parse(&seed.url))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!("Link map covers {} pages", links.len());

    let policy = OffsiteHopPolicy::new(config.crawler.max_offsite_hops);
    let walker = Walker::new(&config.crawler, links, policy)?;
    walker.run(seeds).await
}
