//! Observer interface and error types for crawl output
//!
//! Observers are passive: the coordinator notifies them once per completed
//! fetch and ignores anything they do with the notification.

use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Receives one notification per visited page
///
/// Called from concurrently running fetch tasks, so implementations must be
/// thread-safe.
pub trait Observer: Send + Sync {
    /// A page was fetched and classified
    ///
    /// # Arguments
    ///
    /// * `status` - HTTP status of the response
    /// * `url` - The canonical URL that was fetched
    /// * `links` - Raw candidate links found on the page
    /// * `errors` - Errors detected on the page, empty for healthy pages
    fn on_visited(&self, status: u16, url: &str, links: &[String], errors: &[String]);
}

/// Fans each notification out to several observers, in insertion order
#[derive(Default, Clone)]
pub struct ObserverSet {
    observers: Vec<Arc<dyn Observer>>,
}

impl ObserverSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an observer to the set
    pub fn with(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }
}

impl Observer for ObserverSet {
    fn on_visited(&self, status: u16, url: &str, links: &[String], errors: &[String]) {
        for observer in &self.observers {
            observer.on_visited(status, url, links, errors);
        }
    }
}
