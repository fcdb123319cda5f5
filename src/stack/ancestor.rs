use crate::stack::entry::{AdderKey, StackEntry};
use crate::StackError;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Largest crawl depth a stack may be sized for
pub const MAX_DEPTH_LIMIT: usize = 1_000_000;

/// Result of a combined peek/pop
#[derive(Debug, Clone)]
pub struct PeekOutcome<U, S> {
    /// The entry that was on top when the call ran
    pub entry: Arc<StackEntry<U, S>>,

    /// Whether this call removed `entry` from the stack
    pub popped: bool,
}

/// Slot array and top index, only ever touched under the lock
struct Slots<U, S> {
    slots: Box<[Option<Arc<StackEntry<U, S>>>]>,

    /// Index of the topmost occupied slot, `None` when empty
    top: Option<usize>,
}

/// A bounded stack of ancestor state shared by crawl workers
///
/// The stack holds the state a crawler set for pages whose descendants it is
/// still visiting in depth-first order. Its capacity is the crawl depth plus
/// one (the seed page) and never grows.
///
/// All operations take a single mutex for their full duration, so a
/// `peek_or_pop` is never interleaved with another `push` or `peek_or_pop`.
pub struct AncestorStack<U, S> {
    inner: Mutex<Slots<U, S>>,
    max_depth: usize,
}

impl<U, S> AncestorStack<U, S> {
    /// Creates an empty stack sized for `max_depth`
    ///
    /// # Arguments
    ///
    /// * `max_depth` - The crawl depth; the stack keeps one slot per level
    ///   plus one for the seed page
    ///
    /// # Returns
    ///
    /// * `Ok(AncestorStack)` - A stack with `max_depth + 1` slots
    /// * `Err(StackError::Configuration)` - `max_depth` is zero or larger
    ///   than [`MAX_DEPTH_LIMIT`]
    pub fn new(max_depth: usize) -> Result<Self, StackError> {
        if max_depth == 0 {
            return Err(StackError::Configuration(
                "max depth must be at least 1, got 0".to_string(),
            ));
        }

        if max_depth > MAX_DEPTH_LIMIT {
            return Err(StackError::Configuration(format!(
                "max depth must be at most {}, got {}",
                MAX_DEPTH_LIMIT, max_depth
            )));
        }

        let capacity = max_depth + 1;
        let slots = (0..capacity).map(|_| None).collect::<Vec<_>>();

        Ok(Self {
            inner: Mutex::new(Slots {
                slots: slots.into_boxed_slice(),
                top: None,
            }),
            max_depth,
        })
    }

    /// The crawl depth this stack was sized for
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Number of slots, `max_depth + 1`
    pub fn capacity(&self) -> usize {
        self.max_depth + 1
    }

    /// Number of entries currently held
    pub fn len(&self) -> usize {
        self.lock().top.map_or(0, |top| top + 1)
    }

    /// Returns true if no entries are held
    pub fn is_empty(&self) -> bool {
        self.lock().top.is_none()
    }

    /// Index of the topmost entry, `None` when empty
    pub fn top_index(&self) -> Option<usize> {
        self.lock().top
    }

    /// Every critical section leaves the slots consistent, so a poisoned
    /// lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, Slots<U, S>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<U: AdderKey, S> AncestorStack<U, S> {
    /// Pushes a new entry if there is space
    ///
    /// A `false` result is the normal outcome at maximum crawl depth: the
    /// caller should stop tracking state for deeper descendants. The stack is
    /// left unchanged in that case.
    ///
    /// # Returns
    ///
    /// * `true` - The entry is now on top
    /// * `false` - Every slot is occupied
    pub fn push(&self, entry: StackEntry<U, S>) -> bool {
        let entry = Arc::new(entry);

        let pushed_at = {
            let mut guard = self.lock();
            let next = guard.top.map_or(0, |top| top + 1);

            if next < guard.slots.len() {
                guard.slots[next] = Some(entry);
                guard.top = Some(next);
                Some(next)
            } else {
                None
            }
        };

        match pushed_at {
            Some(index) => {
                tracing::trace!(top = index, "Pushed ancestor entry");
                true
            }
            None => {
                tracing::debug!(
                    capacity = self.capacity(),
                    "Ancestor stack is full, not tracking deeper state"
                );
                false
            }
        }
    }

    /// Returns the top entry, popping it if it was added by `current_url`
    ///
    /// The read and the conditional pop happen under one lock acquisition.
    /// The returned entry is the one that was on top before the call,
    /// whether or not it was popped.
    ///
    /// # Arguments
    ///
    /// * `current_url` - The page the caller is about to handle. It is a
    ///   descendant of every URL on the stack, or the URL of the top entry
    ///   when the caller is returning to it.
    ///
    /// # Returns
    ///
    /// * `Some(entry)` - The entry that was on top
    /// * `None` - The stack is empty
    pub fn peek_or_pop(&self, current_url: &U) -> Option<Arc<StackEntry<U, S>>> {
        self.peek_or_pop_outcome(current_url)
            .map(|outcome| outcome.entry)
    }

    /// Same as [`peek_or_pop`](Self::peek_or_pop), also reporting whether
    /// this call performed the pop
    pub fn peek_or_pop_outcome(&self, current_url: &U) -> Option<PeekOutcome<U, S>> {
        let (outcome, index) = {
            let mut guard = self.lock();
            let top = guard.top?;
            let entry = guard.slots[top].clone()?;

            let popped = entry.matches_adder(current_url);
            if popped {
                guard.slots[top] = None;
                guard.top = top.checked_sub(1);
            }

            (PeekOutcome { entry, popped }, top)
        };

        if outcome.popped {
            tracing::trace!(top = index, "Popped ancestor entry");
        }

        Some(outcome)
    }
}

impl<U, S> fmt::Debug for AncestorStack<U, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AncestorStack")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .finish()
    }
}
