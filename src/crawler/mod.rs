//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `PageClient` capability
//! - HTML tree queries and page classification
//! - Bounded-concurrency breadth-first coordination

mod classifier;
mod coordinator;
pub mod dom;
mod fetcher;

pub use classifier::{find_links, parse_onclick, Classification, Classifier, PageClassifier, BROKEN_PAGE};
pub use coordinator::{Coordinator, CrawlSettings, WorkItem};
pub use fetcher::{DocumentCallback, HttpClient, PageClient};

use crate::config::Config;
use crate::output::Observer;
use crate::SmokeError;
use std::sync::Arc;

/// Runs a complete crawl described by a configuration
///
/// This is the main entry point for a configured crawl. It will:
/// 1. Build the session-keeping HTTP client
/// 2. Build the classifier from the configured page markers
/// 3. Crawl from the configured seed, notifying `observer` per page
///
/// # Arguments
///
/// * `config` - The validated configuration
/// * `observer` - Receives one notification per completed fetch
///
/// # Returns
///
/// * `Ok(usize)` - Number of distinct pages visited
/// * `Err(SmokeError)` - The client could not be built, or the site root or seed was rejected
pub async fn crawl(config: &Config, observer: Arc<dyn Observer>) -> Result<usize, SmokeError> {
    let client = HttpClient::new(&config.site, &config.crawler)?;
    let classifier = PageClassifier::new(config.classifier.clone());

    let coordinator = Coordinator::new(
        CrawlSettings::from(config),
        Arc::new(client),
        Arc::new(classifier),
    )
    .with_observer(observer);

    coordinator.run(&config.site.seed).await
}
