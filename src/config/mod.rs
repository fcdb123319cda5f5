//! Configuration module for Ripple-Stack
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use ripple_stack::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Ancestor stack will hold {} levels", config.crawler.max_depth + 1);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, LinkEntry, SeedEntry};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_from_str, load_config_with_hash};
pub use validation::validate;
