//! Site-Smoke: a single-site health crawler
//!
//! This crate walks one web site breadth-first from a seed path, follows every
//! internal link it can find (including links hidden in inline `onclick`
//! handlers), and reports which pages were visited and which of them looked
//! broken: non-200 responses, login redirects, stack traces, or inline error markup.

pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Smoke operations
#[derive(Debug, Error)]
pub enum SmokeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Failed to read response body from {url}: {source}")]
    Body { url: String, source: reqwest::Error },

    #[error("Invalid site root: {0}")]
    InvalidSite(String),

    #[error("Seed URL rejected: {0}")]
    SeedRejected(String),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

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

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Classification, Coordinator, CrawlSettings, HttpClient, PageClassifier};
pub use output::{Observer, ObserverSet};
pub use url::{canonicalize, in_scope, ScopeRules};
