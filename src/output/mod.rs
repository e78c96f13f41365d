//! Output module: observers of the crawl and run reports
//!
//! This module handles:
//! - Logging every error found on a visited page
//! - Visit statistics by `uuid` prefix
//! - Collecting a per-run report and rendering it as markdown

mod log;
mod markdown;
mod report;
pub mod stats;
mod traits;

pub use log::{error_line, error_lines, LogObserver};
pub use markdown::{format_markdown_report, write_markdown_report};
pub use report::{CrawlReport, PageRecord, ReportObserver};
pub use stats::{print_statistics, UuidPrefixStats};
pub use traits::{Observer, ObserverSet, OutputError, OutputResult};
