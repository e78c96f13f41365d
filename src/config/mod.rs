//! Configuration module for Site-Smoke
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use site_smoke::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("smoke.toml")).unwrap();
//! println!("Crawling {} from {}", config.site.base_url, config.site.seed);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ClassifierConfig, Config, CrawlerConfig, OutputConfig, ScopeConfig, SiteConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
