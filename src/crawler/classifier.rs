//! Page classification: error detection and link extraction
//!
//! Given the HTTP status and the parsed document of a page, the classifier
//! decides whether the page is healthy and which hrefs are worth following.
//! Links hidden in inline `onclick` handlers (`window.open(...)` and
//! `open_in_new_window(...)`) are extracted too, except when the handler asks
//! for confirmation first, since those guard destructive actions.

use crate::config::ClassifierConfig;
use crate::crawler::dom;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

/// Error reported for non-200 responses and pages showing a stack trace
pub const BROKEN_PAGE: &str = "Broken page";

static CONFIRM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[^a-zA-Z_])confirm\s*\(").expect("valid confirm pattern"));

static WINDOW_OPEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"window\.open\s*\(\s*['"]+([^'"]*)"#).expect("valid window.open pattern")
});

static OPEN_IN_NEW_WINDOW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"open_in_new_window\s*\(\s*['"]+([^'"]*)"#)
        .expect("valid open_in_new_window pattern")
});

/// Outcome of classifying one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Raw candidate hrefs in document order (not yet canonicalized)
    pub links: Vec<String>,

    /// Error descriptions; non-empty marks the page as unhealthy
    pub errors: Vec<String>,
}

impl Classification {
    fn broken() -> Self {
        Self {
            links: Vec::new(),
            errors: vec![BROKEN_PAGE.to_string()],
        }
    }
}

/// Turns a fetched page into followable links and error descriptions
pub trait Classifier: Send + Sync {
    /// Classifies a page
    ///
    /// # Arguments
    ///
    /// * `status` - HTTP status code of the response
    /// * `url` - The URL that was fetched (used in error messages)
    /// * `document` - The parsed response body
    fn classify(&self, status: u16, url: &str, document: &Html) -> Classification;
}

/// Classifier driven by the marker elements configured for the target site
#[derive(Debug, Clone, Default)]
pub struct PageClassifier {
    markers: ClassifierConfig,
}

impl PageClassifier {
    /// Creates a classifier looking for the given marker ids and classes
    pub fn new(markers: ClassifierConfig) -> Self {
        Self { markers }
    }

    /// Finds the page-level errors, first match wins
    ///
    /// | Marker | Error |
    /// |--------|-------|
    /// | element with the stack trace id | `Broken page` |
    /// | element with the error class | its text |
    /// | element with the message-error class | its text |
    fn find_errors(&self, document: &Html) -> Vec<String> {
        if dom::first_by_id(document, &self.markers.stack_trace_id).is_some() {
            return vec![BROKEN_PAGE.to_string()];
        }

        [&self.markers.error_class, &self.markers.message_error_class]
            .into_iter()
            .find_map(|class| dom::first_by_class(document, class))
            .map(|element| vec![dom::text_of(&element)])
            .unwrap_or_default()
    }
}

impl Classifier for PageClassifier {
    /// # Precedence
    ///
    /// 1. Status other than 200 → `Broken page`, no links
    /// 2. Login form present → `Login form detected at <url>`, no links
    /// 3. Otherwise errors from the page markers, plus all links
    fn classify(&self, status: u16, url: &str, document: &Html) -> Classification {
        if status != 200 {
            return Classification::broken();
        }

        if dom::first_by_id(document, &self.markers.login_form_id).is_some() {
            return Classification {
                links: Vec::new(),
                errors: vec![format!("Login form detected at {}", url)],
            };
        }

        Classification {
            errors: self.find_errors(document),
            links: find_links(document),
        }
    }
}

/// Collects candidate links from every anchor: `href` first, then `onclick`
pub fn find_links(document: &Html) -> Vec<String> {
    let mut links = Vec::new();

    for anchor in dom::elements_by_tag(document, "a") {
        if let Some(href) = dom::attribute(&anchor, "href") {
            if !href.is_empty() && href != "#" {
                links.push(href.to_string());
            }
        }

        if let Some(link) = dom::attribute(&anchor, "onclick").and_then(parse_onclick) {
            links.push(link);
        }
    }

    links
}

/// Extracts the navigation target of an inline `onclick` handler
///
/// Returns `None` for handlers that ask for confirmation, and for handlers
/// that do not open a window.
///
/// # Examples
///
/// ```
/// use site_smoke::crawler::parse_onclick;
///
/// assert_eq!(
///     parse_onclick("window.open('/report?id=1')"),
///     Some("/report?id=1".to_string())
/// );
/// assert_eq!(parse_onclick("if (confirm('Delete?')) open_in_new_window('/del')"), None);
/// ```
pub fn parse_onclick(handler: &str) -> Option<String> {
    if CONFIRM.is_match(handler) {
        return None;
    }

    [&*WINDOW_OPEN, &*OPEN_IN_NEW_WINDOW]
        .into_iter()
        .find_map(|pattern| pattern.captures(handler))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|link| !link.is_empty())
}
