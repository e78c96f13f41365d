//! Per-run report collected from observer notifications

use crate::output::traits::Observer;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

/// What was seen on one visited page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub url: String,
    pub status: u16,
    pub link_count: usize,
    pub errors: Vec<String>,
}

/// Summary of one crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub site: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub config_hash: Option<String>,

    /// Distinct URLs admitted by the coordinator, including failed fetches
    pub visited: usize,

    /// Pages that were fetched, in completion order
    pub pages: Vec<PageRecord>,

    /// Visits per `uuid` prefix
    pub prefix_stats: BTreeMap<String, u64>,
}

impl CrawlReport {
    /// Pages that reported at least one error
    pub fn pages_with_errors(&self) -> impl Iterator<Item = &PageRecord> {
        self.pages.iter().filter(|p| !p.errors.is_empty())
    }

    /// Total number of errors across all pages
    pub fn total_errors(&self) -> usize {
        self.pages.iter().map(|p| p.errors.len()).sum()
    }

    /// Number of fetched pages per HTTP status
    pub fn status_breakdown(&self) -> BTreeMap<u16, u64> {
        let mut breakdown = BTreeMap::new();
        for page in &self.pages {
            *breakdown.entry(page.status).or_insert(0) += 1;
        }
        breakdown
    }

    /// Visited URLs that never produced a response
    pub fn unreachable(&self) -> usize {
        self.visited.saturating_sub(self.pages.len())
    }

    /// Run duration in seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// Observer recording every visited page for the final report
#[derive(Debug)]
pub struct ReportObserver {
    site: String,
    started_at: DateTime<Utc>,
    pages: Mutex<Vec<PageRecord>>,
}

impl ReportObserver {
    /// Starts recording a run against `site`
    pub fn new(site: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            started_at: Utc::now(),
            pages: Mutex::new(Vec::new()),
        }
    }

    /// Number of pages recorded so far
    pub fn recorded(&self) -> usize {
        self.pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Closes the run and builds its report
    pub fn finish(
        &self,
        visited: usize,
        prefix_stats: BTreeMap<String, u64>,
        config_hash: Option<String>,
    ) -> CrawlReport {
        let pages = self
            .pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        CrawlReport {
            site: self.site.clone(),
            started_at: self.started_at,
            finished_at: Utc::now(),
            config_hash,
            visited,
            pages,
            prefix_stats,
        }
    }
}

impl Observer for ReportObserver {
    fn on_visited(&self, status: u16, url: &str, links: &[String], errors: &[String]) {
        let record = PageRecord {
            url: url.to_string(),
            status,
            link_count: links.len(),
            errors: errors.to_vec(),
        };

        self.pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }
}
