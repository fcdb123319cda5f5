//! Depth-first walker - drives crawl workers over a shared ancestor stack
//!
//! Workers share one frontier of steps in stack order:
//! - `Enter(url)` claims the page in the visited set, peeks the ancestor
//!   stack with `url`, asks the policy whether to visit, pushes the page's
//!   branch state and queues its children followed by `Leave(url)` (children
//!   run first)
//! - `Leave(url)` peeks with `url` again, which retires the page's entry once
//!   its subtree is done
//!
//! With a single worker the ancestor stack mirrors the traversal path
//! exactly. With several workers branches interleave on the same stack, and
//! a `Leave` may find another branch's entry on top; that entry stays until
//! its own page returns to it.

use crate::config::CrawlerConfig;
use crate::crawler::links::LinkSource;
use crate::crawler::policy::BranchPolicy;
use crate::stack::{AncestorStack, StackEntry};
use crate::url::CrawlUrl;
use crate::{ConfigError, RippleError, StackError};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use tokio::task::JoinSet;

/// One unit of work in the shared frontier
#[derive(Debug, Clone)]
enum Step {
    Enter { url: CrawlUrl, depth: u32 },
    Leave { url: CrawlUrl },
}

/// What a worker does next
enum Next {
    Step(Step),
    Wait,
    Done,
}

/// Pending steps plus the number of steps being handled right now
#[derive(Debug, Default)]
struct Frontier {
    steps: Vec<Step>,
    in_flight: usize,
}

/// A page the walker visited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageVisit {
    pub url: CrawlUrl,
    pub depth: u32,
}

/// Summary of a finished walk
#[derive(Debug, Clone, Default)]
pub struct WalkReport {
    /// Visited pages in visit order
    pub visited: Vec<PageVisit>,

    /// Pages the branch policy declined
    pub policy_skips: usize,

    /// Links not followed because they lie beyond the maximum depth
    pub depth_skips: usize,

    /// Pages reached again after their first visit
    pub duplicate_skips: usize,

    /// Visited pages whose state did not fit on the ancestor stack
    pub untracked_branches: usize,

    /// Entries popped when their page was returned to
    pub retired_entries: usize,

    /// Entries still on the stack when the walk ended
    pub stack_residue: usize,
}

impl WalkReport {
    /// Returns the depth at which `url` was visited, if it was
    pub fn depth_of(&self, url: &CrawlUrl) -> Option<u32> {
        self.visited
            .iter()
            .find(|visit| &visit.url == url)
            .map(|visit| visit.depth)
    }
}

/// State shared by every worker of one walk
struct Shared<L, P: BranchPolicy> {
    links: L,
    policy: P,
    stack: Arc<AncestorStack<CrawlUrl, P::State>>,
    max_depth: u32,
    frontier: Mutex<Frontier>,
    visited: Mutex<HashSet<CrawlUrl>>,
    report: Mutex<WalkReport>,
    wakeup: Notify,
}

/// Depth-first walker over a link source
///
/// A walker is one crawl session: it owns the ancestor stack sized for the
/// configured depth and is consumed by [`Walker::run`].
pub struct Walker<L, P: BranchPolicy> {
    links: L,
    policy: P,
    stack: Arc<AncestorStack<CrawlUrl, P::State>>,
    max_depth: u32,
    workers: usize,
}

impl<L, P> Walker<L, P>
where
    L: LinkSource + 'static,
    P: BranchPolicy + 'static,
{
    /// Creates a walker and its ancestor stack
    ///
    /// # Returns
    ///
    /// * `Ok(Walker)` - Ready to run
    /// * `Err(RippleError::Config)` - No workers are configured
    /// * `Err(RippleError::Stack)` - The configured depth cannot size a stack
    pub fn new(config: &CrawlerConfig, links: L, policy: P) -> Result<Self, RippleError> {
        if config.workers == 0 {
            return Err(ConfigError::Validation("workers must be at least 1".to_string()).into());
        }
        let stack = AncestorStack::new(config.max_depth as usize)?;

        Ok(Self {
            links,
            policy,
            stack: Arc::new(stack),
            max_depth: config.max_depth,
            workers: config.workers as usize,
        })
    }

    /// The ancestor stack this walker's workers share
    pub fn stack(&self) -> Arc<AncestorStack<CrawlUrl, P::State>> {
        Arc::clone(&self.stack)
    }

    /// Walks every page reachable from `seeds` and returns the report
    ///
    /// Seeds are entered in the given order at depth 0.
    pub async fn run(self, seeds: Vec<CrawlUrl>) -> Result<WalkReport, RippleError> {
        tracing::info!(
            "Starting walk with {} seeds, {} workers, max depth {}",
            seeds.len(),
            self.workers,
            self.max_depth
        );

        let steps = seeds
            .into_iter()
            .rev()
            .map(|url| Step::Enter { url, depth: 0 })
            .collect();

        let shared = Arc::new(Shared {
            links: self.links,
            policy: self.policy,
            stack: self.stack,
            max_depth: self.max_depth,
            frontier: Mutex::new(Frontier {
                steps,
                in_flight: 0,
            }),
            visited: Mutex::new(HashSet::new()),
            report: Mutex::new(WalkReport::default()),
            wakeup: Notify::new(),
        });

        let mut tasks = JoinSet::new();
        for worker_id in 0..self.workers {
            let shared = Arc::clone(&shared);
            tasks.spawn(async move { shared.work(worker_id).await });
        }

        let mut first_error = None;
        while let Some(joined) = tasks.join_next().await {
            let result = joined.map_err(RippleError::from).and_then(|r| r);
            if let Err(e) = result {
                tracing::error!("Walker worker failed: {}", e);
                first_error.get_or_insert(e);
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }

        let mut report = std::mem::take(&mut *lock(&shared.report));
        report.stack_residue = shared.stack.len();

        tracing::info!(
            "Walk complete: {} pages visited, {} entries retired, {} left on stack",
            report.visited.len(),
            report.retired_entries,
            report.stack_residue
        );

        Ok(report)
    }
}

impl<L, P> Shared<L, P>
where
    L: LinkSource,
    P: BranchPolicy,
{
    async fn work(&self, worker_id: usize) -> Result<(), RippleError> {
        loop {
            // Registered before checking so a notify between the check and
            // the await is not lost
            let wakeup = self.wakeup.notified();

            let next = {
                let mut frontier = lock(&self.frontier);
                match frontier.steps.pop() {
                    Some(step) => {
                        frontier.in_flight += 1;
                        Next::Step(step)
                    }
                    None if frontier.in_flight == 0 => Next::Done,
                    None => Next::Wait,
                }
            };

            let step = match next {
                Next::Step(step) => step,
                Next::Wait => {
                    wakeup.await;
                    continue;
                }
                Next::Done => {
                    tracing::trace!(worker = worker_id, "Frontier drained, worker exiting");
                    self.wakeup.notify_waiters();
                    return Ok(());
                }
            };

            tracing::trace!(worker = worker_id, ?step, "Handling step");
            let outcome = self.handle(step);

            let done = {
                let mut frontier = lock(&self.frontier);
                frontier.in_flight -= 1;
                frontier.in_flight == 0 && frontier.steps.is_empty()
            };
            if done {
                self.wakeup.notify_waiters();
            }

            outcome?;
        }
    }

    fn handle(&self, step: Step) -> Result<(), StackError> {
        match step {
            Step::Enter { url, depth } => self.enter(url, depth),
            Step::Leave { url } => {
                self.leave(&url);
                Ok(())
            }
        }
    }

    fn enter(&self, url: CrawlUrl, depth: u32) -> Result<(), StackError> {
        // Claim the page before reading the stack: only the first visit may
        // push an entry tagged with `url`, so a repeat never reaches the stack
        if !lock(&self.visited).insert(url.clone()) {
            tracing::trace!("Already visited {}", url);
            lock(&self.report).duplicate_skips += 1;
            return Ok(());
        }

        // An entry tagged `url` is only pushed below, so this never pops
        let ancestor = self.stack.peek_or_pop(&url);
        let ancestor_state = ancestor.as_deref().and_then(StackEntry::state);

        if !self.policy.should_visit(&url, ancestor_state) {
            tracing::debug!("Policy declined {}", url);
            // Declined pages stay reachable from other branches
            lock(&self.visited).remove(&url);
            lock(&self.report).policy_skips += 1;
            return Ok(());
        }

        tracing::debug!("Visiting {} at depth {}", url, depth);
        let children = self.links.links(&url);

        let tracked = match self.policy.branch_state(&url, ancestor_state) {
            Some(state) => {
                let pushed = self.stack.push(StackEntry::with_state(url.clone(), state)?);
                if !pushed {
                    tracing::debug!("Ancestor stack full, {} is untracked", url);
                }
                pushed
            }
            None => false,
        };

        let next_depth = depth + 1;
        let mut steps = Vec::with_capacity(children.len() + 1);
        if tracked {
            steps.push(Step::Leave { url: url.clone() });
        }

        let skipped_for_depth = if next_depth > self.max_depth {
            children.len()
        } else {
            steps.extend(children.into_iter().rev().map(|child| Step::Enter {
                url: child,
                depth: next_depth,
            }));
            0
        };

        {
            let mut report = lock(&self.report);
            report.visited.push(PageVisit { url, depth });
            report.depth_skips += skipped_for_depth;
            if !tracked {
                report.untracked_branches += 1;
            }
        }

        if !steps.is_empty() {
            lock(&self.frontier).steps.extend(steps);
            self.wakeup.notify_waiters();
        }

        Ok(())
    }

    fn leave(&self, url: &CrawlUrl) {
        match self.stack.peek_or_pop_outcome(url) {
            Some(outcome) if outcome.popped => {
                tracing::trace!("Retired branch state of {}", url);
                lock(&self.report).retired_entries += 1;
            }
            _ => {
                tracing::trace!("State of {} is not on top, leaving it", url);
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
