//! Error-page logging

use crate::output::traits::Observer;

/// Logs one warning line per error found on a page
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl LogObserver {
    pub fn new() -> Self {
        Self
    }
}

/// Formats the log line for one page error
pub fn error_line(status: u16, url: &str, error: &str) -> String {
    format!("Error page {} :: {} :: {}", status, url, error)
}

/// The log lines for a page, one per error
pub fn error_lines(status: u16, url: &str, errors: &[String]) -> Vec<String> {
    errors
        .iter()
        .map(|error| error_line(status, url, error))
        .collect()
}

impl Observer for LogObserver {
    fn on_visited(&self, status: u16, url: &str, _links: &[String], errors: &[String]) {
        for line in error_lines(status, url, errors) {
            tracing::warn!("{}", line);
        }
    }
}
