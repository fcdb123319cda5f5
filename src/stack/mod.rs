//! Stack module for ancestor-state tracking
//!
//! This module provides the bounded stack that crawl workers share while
//! traversing pages in depth-first order.
//!
//! # Components
//!
//! - `StackEntry`: Immutable state tagged with the URL that pushed it
//! - `AncestorStack`: Fixed-capacity, mutex-protected stack of entries
//! - `AdderKey`: Identity contract for the URL type used as the tag
//!
//! # Example
//!
//! ```
//! use ripple_stack::stack::{AncestorStack, StackEntry};
//!
//! let stack: AncestorStack<String, u32> = AncestorStack::new(2).unwrap();
//! let root = "https://example.com/".to_string();
//!
//! assert!(stack.push(StackEntry::with_state(root.clone(), 7).unwrap()));
//!
//! // A descendant sees the state without removing it
//! let child = "https://example.com/a".to_string();
//! assert_eq!(stack.peek_or_pop(&child).unwrap().state(), Some(&7));
//! assert_eq!(stack.len(), 1);
//!
//! // Returning to the root retires it
//! assert!(stack.peek_or_pop(&root).is_some());
//! assert!(stack.is_empty());
//! ```

mod ancestor;
mod entry;

// Re-export main types
pub use ancestor::{AncestorStack, PeekOutcome, MAX_DEPTH_LIMIT};
pub use entry::{AdderKey, StackEntry};
