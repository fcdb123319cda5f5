//! Integration tests for the depth-first walker
//!
//! These tests drive full walks from configuration text and from custom
//! branch policies to check that the shared ancestor stack follows the
//! traversal path.

use ripple_stack::config::{load_config_from_str, CrawlerConfig};
use ripple_stack::crawler::{walk, BranchPolicy, LinkMap, OffsiteHopPolicy, Walker};
use ripple_stack::url::CrawlUrl;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

fn url(s: &str) -> CrawlUrl {
    CrawlUrl::parse(s).expect("valid test URL")
}

const SITE_CONFIG: &str = r#"
[crawler]
max-depth = 3
workers = 1
max-offsite-hops = 1

[[seed]]
url = "https://home.com/"

[[link]]
from = "https://home.com/"
to = ["https://home.com/about", "https://away.org/", "https://home.com/blog"]

[[link]]
from = "https://away.org/"
to = ["https://far.net/", "https://home.com/contact"]

[[link]]
from = "https://far.net/"
to = ["https://far.net/deep"]

[[link]]
from = "https://home.com/blog"
to = ["https://home.com/blog/post-1"]
"#;

#[tokio::test]
async fn test_walk_from_config() {
    let config = load_config_from_str(SITE_CONFIG).unwrap();
    let report = walk(&config).await.unwrap();

    let visited: Vec<&str> = report.visited.iter().map(|v| v.url.as_str()).collect();
    assert_eq!(
        visited,
        vec![
            "https://home.com/",
            "https://home.com/about",
            "https://away.org/",
            "https://home.com/contact",
            "https://home.com/blog",
            "https://home.com/blog/post-1",
        ]
    );

    // far.net is a second consecutive off-site hop
    assert_eq!(report.policy_skips, 1);
    assert_eq!(report.depth_of(&url("https://home.com/contact")), Some(2));
    assert_eq!(report.retired_entries, 6);
    assert_eq!(report.stack_residue, 0);
}

#[tokio::test]
async fn test_walk_with_zero_offsite_hops() {
    let config = load_config_from_str(&SITE_CONFIG.replace(
        "max-offsite-hops = 1",
        "max-offsite-hops = 0",
    ))
    .unwrap();
    let report = walk(&config).await.unwrap();

    assert!(report
        .visited
        .iter()
        .all(|visit| visit.url.domain() == "home.com"));
    assert_eq!(report.visited.len(), 4);
    assert_eq!(report.stack_residue, 0);
}

type Chains = Arc<Mutex<Vec<(CrawlUrl, Vec<CrawlUrl>)>>>;

/// Records, for every visited page, the chain of ancestors it was given
struct PathRecorder {
    seen: Chains,
}

impl BranchPolicy for PathRecorder {
    type State = Vec<CrawlUrl>;

    fn should_visit(&self, _url: &CrawlUrl, _ancestor: Option<&Vec<CrawlUrl>>) -> bool {
        true
    }

    fn branch_state(
        &self,
        url: &CrawlUrl,
        ancestor: Option<&Vec<CrawlUrl>>,
    ) -> Option<Vec<CrawlUrl>> {
        let parents = ancestor.cloned().unwrap_or_default();
        self.seen.lock().unwrap().push((url.clone(), parents.clone()));

        let mut path = parents;
        path.push(url.clone());
        Some(path)
    }
}

fn tree_map() -> LinkMap {
    let mut map = LinkMap::new();
    map.insert(url("https://t.com/"), vec![url("https://t.com/a"), url("https://t.com/b")]);
    map.insert(url("https://t.com/a"), vec![url("https://t.com/a/1"), url("https://t.com/a/2")]);
    map.insert(url("https://t.com/a/1"), vec![url("https://t.com/a/1/x")]);
    map.insert(url("https://t.com/b"), vec![url("https://t.com/b/1")]);
    map
}

#[tokio::test]
async fn test_single_worker_sees_exact_ancestor_chain() {
    let config = CrawlerConfig {
        max_depth: 4,
        workers: 1,
        max_offsite_hops: 0,
    };
    let seen = Chains::default();
    let recorder = PathRecorder {
        seen: Arc::clone(&seen),
    };
    let walker = Walker::new(&config, tree_map(), recorder).unwrap();
    let report = walker.run(vec![url("https://t.com/")]).await.unwrap();

    assert_eq!(report.visited.len(), 7);
    assert_eq!(report.retired_entries, 7);
    assert_eq!(report.stack_residue, 0);

    let seen = seen.lock().unwrap();
    let chain_of = |page: &str| -> Vec<String> {
        seen.iter()
            .find(|(u, _)| u == &url(page))
            .map(|(_, chain)| chain.iter().map(|u| u.as_str().to_string()).collect())
            .unwrap()
    };

    assert!(chain_of("https://t.com/").is_empty());
    assert_eq!(
        chain_of("https://t.com/a/1/x"),
        vec!["https://t.com/", "https://t.com/a", "https://t.com/a/1"]
    );
    assert_eq!(
        chain_of("https://t.com/a/2"),
        vec!["https://t.com/", "https://t.com/a"]
    );
    assert_eq!(
        chain_of("https://t.com/b/1"),
        vec!["https://t.com/", "https://t.com/b"]
    );
}

#[tokio::test]
async fn test_back_links_leave_ancestor_chain_intact() {
    let mut map = LinkMap::new();
    map.insert(
        url("https://t.com/"),
        vec![url("https://t.com/a"), url("https://t.com/"), url("https://t.com/b")],
    );
    map.insert(
        url("https://t.com/a"),
        vec![url("https://t.com/"), url("https://t.com/a"), url("https://t.com/a/1")],
    );

    let config = CrawlerConfig {
        max_depth: 4,
        workers: 1,
        max_offsite_hops: 0,
    };
    let seen = Chains::default();
    let recorder = PathRecorder {
        seen: Arc::clone(&seen),
    };
    let walker = Walker::new(&config, map, recorder).unwrap();
    let report = walker.run(vec![url("https://t.com/")]).await.unwrap();

    assert_eq!(report.visited.len(), 4);
    assert_eq!(report.duplicate_skips, 3);
    assert_eq!(report.retired_entries, 4);
    assert_eq!(report.stack_residue, 0);

    let seen = seen.lock().unwrap();
    let chain_of = |page: &str| -> Vec<String> {
        seen.iter()
            .find(|(u, _)| u == &url(page))
            .map(|(_, chain)| chain.iter().map(|u| u.as_str().to_string()).collect())
            .unwrap()
    };

    assert_eq!(
        chain_of("https://t.com/a/1"),
        vec!["https://t.com/", "https://t.com/a"]
    );
    assert_eq!(chain_of("https://t.com/b"), vec!["https://t.com/"]);
}

#[tokio::test]
async fn test_back_link_does_not_reset_offsite_hops() {
    let config = load_config_from_str(
        r#"
[crawler]
max-depth = 3
workers = 1
max-offsite-hops = 0

[[seed]]
url = "https://home.com/"

[[link]]
from = "https://home.com/"
to = ["https://home.com/", "https://away.org/", "https://home.com/about"]
"#,
    )
    .unwrap();
    let report = walk(&config).await.unwrap();

    let visited: Vec<&str> = report.visited.iter().map(|v| v.url.as_str()).collect();
    assert_eq!(visited, vec!["https://home.com/", "https://home.com/about"]);
    assert_eq!(report.policy_skips, 1);
    assert_eq!(report.duplicate_skips, 1);
    assert_eq!(report.stack_residue, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_workers_visit_every_page_once() {
    let config = CrawlerConfig {
        max_depth: 4,
        workers: 8,
        max_offsite_hops: 0,
    };
    let walker = Walker::new(&config, tree_map(), OffsiteHopPolicy::new(0)).unwrap();
    let stack = walker.stack();
    let report = walker.run(vec![url("https://t.com/")]).await.unwrap();

    let unique: HashSet<_> = report.visited.iter().map(|v| v.url.clone()).collect();
    assert_eq!(report.visited.len(), 7);
    assert_eq!(unique.len(), 7);
    assert_eq!(report.duplicate_skips, 0);

    // Every tracked entry is either retired or still on the stack
    let tracked = report.visited.len() - report.untracked_branches;
    assert_eq!(report.retired_entries + report.stack_residue, tracked);
    assert_eq!(stack.len(), report.stack_residue);
    assert!(stack.len() <= stack.capacity());
}

#[tokio::test]
async fn test_seeds_share_one_stack() {
    let mut map = LinkMap::new();
    map.insert(url("https://t.com/"), vec![url("https://t.com/1")]);
    map.insert(url("https://t.com/1"), vec![url("https://t.com/1/2")]);

    // The first seed's branch fills all three slots and is fully retired
    // before the second seed starts
    let config = CrawlerConfig {
        max_depth: 2,
        workers: 1,
        max_offsite_hops: 0,
    };
    let walker = Walker::new(&config, map, OffsiteHopPolicy::new(0)).unwrap();
    let report = walker
        .run(vec![url("https://t.com/"), url("https://s.com/")])
        .await
        .unwrap();

    assert_eq!(report.visited.len(), 4);
    assert_eq!(report.untracked_branches, 0);
    assert_eq!(report.stack_residue, 0);
    assert_eq!(report.depth_of(&url("https://s.com/")), Some(0));
}
