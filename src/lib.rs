//! Ripple-Stack: bounded ancestor-state tracking for depth-first crawls
//!
//! This crate provides a thread-safe, depth-bounded stack that records which
//! URL pushed each piece of branch state, so a pool of crawl workers can
//! retire that state once the branch is finished. A small depth-first walker
//! over an offline link map shows the stack in use.

pub mod config;
pub mod crawler;
pub mod stack;
pub mod url;

use thiserror::Error;

/// Main error type for Ripple-Stack operations
#[derive(Debug, Error)]
pub enum RippleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Stack error: {0}")]
    Stack(#[from] StackError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Walker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while constructing a stack or its entries
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StackError {
    #[error("Invalid stack configuration: {0}")]
    Configuration(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for Ripple-Stack operations
pub type Result<T> = std::result::Result<T, RippleError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use stack::{AdderKey, AncestorStack, PeekOutcome, StackEntry};
pub use crate::url::{extract_domain, normalize_url, CrawlUrl};
