//! Markdown report generation
//!
//! Renders a `CrawlReport` as a human-readable smoke-test summary: run
//! information, overall counts, status breakdown, the pages that showed
//! errors, and visit statistics by `uuid` prefix.

use crate::output::report::CrawlReport;
use crate::output::traits::{OutputError, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Maximum number of error pages listed in the report
const MAX_ERROR_PAGES: usize = 200;

/// Writes the markdown report to `output_path`
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to create or write the file
pub fn write_markdown_report(report: &CrawlReport, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_report(report);

    let mut file = File::create(output_path).map_err(|e| {
        OutputError::Write(format!("cannot create {}: {}", output_path.display(), e))
    })?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl report as markdown
pub fn format_markdown_report(report: &CrawlReport) -> String {
    let mut md = String::new();

    md.push_str("# Site Smoke Report\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Site**: {}\n", report.site));
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", report.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {} seconds\n",
        report.duration_seconds()
    ));
    if let Some(hash) = &report.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Overall statistics
    let error_pages = report.pages_with_errors().count();
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Visited URLs**: {}\n", report.visited));
    md.push_str(&format!("- **Fetched Pages**: {}\n", report.pages.len()));
    md.push_str(&format!("- **Unreachable**: {}\n", report.unreachable()));
    md.push_str(&format!("- **Pages With Errors**: {}\n", error_pages));
    md.push_str(&format!("- **Total Errors**: {}\n\n", report.total_errors()));

    // Status breakdown
    let breakdown = report.status_breakdown();
    if !breakdown.is_empty() {
        md.push_str("## Status Breakdown\n\n");
        md.push_str("| Status | Pages |\n");
        md.push_str("|--------|-------|\n");
        for (status, count) in &breakdown {
            md.push_str(&format!("| {} | {} |\n", status, count));
        }
        md.push('\n');
    }

    // Error pages
    if error_pages > 0 {
        md.push_str("## Pages With Errors\n\n");
        md.push_str("| Status | URL | Error |\n");
        md.push_str("|--------|-----|-------|\n");
        for page in report.pages_with_errors().take(MAX_ERROR_PAGES) {
            for error in &page.errors {
                md.push_str(&format!(
                    "| {} | {} | {} |\n",
                    page.status,
                    escape_cell(&page.url),
                    escape_cell(error)
                ));
            }
        }
        if error_pages > MAX_ERROR_PAGES {
            md.push_str(&format!(
                "\n... and {} more pages\n",
                error_pages - MAX_ERROR_PAGES
            ));
        }
        md.push('\n');
    }

    // uuid prefix statistics
    if !report.prefix_stats.is_empty() {
        md.push_str("## Visits by uuid Prefix\n\n");
        md.push_str("| Prefix | Visits |\n");
        md.push_str("|--------|--------|\n");
        for (prefix, count) in &report.prefix_stats {
            md.push_str(&format!("| {} | {} |\n", prefix, count));
        }
        md.push('\n');
    }

    md
}

/// Keeps an error message on one table row
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}
