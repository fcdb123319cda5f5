//! Branch policies decide what ancestor state the walker pushes

use crate::url::CrawlUrl;

/// Decides whether to visit a page and what state its branch carries
///
/// `ancestor` is the state on top of the ancestor stack when the walker
/// reached the page, i.e. the state of its closest tracked ancestor.
pub trait BranchPolicy: Send + Sync {
    /// State pushed for a page and seen by its descendants
    type State: Send + Sync + 'static;

    /// Returns true if `url` should be visited
    fn should_visit(&self, url: &CrawlUrl, ancestor: Option<&Self::State>) -> bool;

    /// State to push for a visited page, or `None` to leave the stack alone
    fn branch_state(&self, url: &CrawlUrl, ancestor: Option<&Self::State>)
        -> Option<Self::State>;
}

/// State carried by [`OffsiteHopPolicy`] branches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchState {
    /// Domain of the seed that started this branch
    pub home_domain: String,

    /// Consecutive pages outside `home_domain` ending at this page
    pub offsite_hops: u32,
}

/// Limits how far a branch may wander away from its seed's domain
#[derive(Debug, Clone, Copy)]
pub struct OffsiteHopPolicy {
    max_offsite_hops: u32,
}

impl OffsiteHopPolicy {
    pub fn new(max_offsite_hops: u32) -> Self {
        Self { max_offsite_hops }
    }

    fn hops_for(url: &CrawlUrl, ancestor: Option<&BranchState>) -> u32 {
        match ancestor {
            None => 0,
            Some(state) if url.domain() == state.home_domain => 0,
            Some(state) => state.offsite_hops + 1,
        }
    }
}

impl BranchPolicy for OffsiteHopPolicy {
    type State = BranchState;

    fn should_visit(&self, url: &CrawlUrl, ancestor: Option<&BranchState>) -> bool {
        Self::hops_for(url, ancestor) <= self.max_offsite_hops
    }

    fn branch_state(&self, url: &CrawlUrl, ancestor: Option<&BranchState>) -> Option<BranchState> {
        let home_domain = ancestor.map_or(url.domain(), |state| state.home_domain.as_str());

        Some(BranchState {
            home_domain: home_domain.to_string(),
            offsite_hops: Self::hops_for(url, ancestor),
        })
    }
}
