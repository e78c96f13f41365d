use crate::url::{ScopeRules, DEFAULT_BLOCKED_MARKER, DEFAULT_BLOCKED_PATH};
use serde::Deserialize;

/// Main configuration structure for Site-Smoke
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub scope: ScopeConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// The site under test
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Site root (scheme + host) defining the crawl scope
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path or URL the crawl starts from
    #[serde(default = "default_seed")]
    pub seed: String,

    /// HTTP basic auth user
    #[serde(default)]
    pub user: Option<String>,

    /// HTTP basic auth password
    #[serde(default)]
    pub password: Option<String>,
}

fn default_seed() -> String {
    "/".to_string()
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of concurrent page fetches
    #[serde(rename = "max-parallel-requests")]
    pub max_parallel_requests: usize,

    /// Maximum link distance from the seed, -1 for unbounded
    #[serde(rename = "max-depth")]
    pub max_depth: i64,

    /// Per-request timeout in seconds; no timeout when absent
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: Option<u64>,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_parallel_requests: 4,
            max_depth: -1,
            request_timeout_secs: None,
            user_agent: format!("site-smoke/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl CrawlerConfig {
    /// The depth limit, `None` when unbounded
    pub fn depth_limit(&self) -> Option<u32> {
        if self.max_depth < 0 {
            None
        } else {
            Some(u32::try_from(self.max_depth).unwrap_or(u32::MAX))
        }
    }
}

/// Site-specific exclusions
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Paths never crawled (exact match), e.g. the logout path
    #[serde(rename = "blocked-paths")]
    pub blocked_paths: Vec<String>,

    /// Substrings excluding any URL that contains them
    #[serde(rename = "blocked-markers")]
    pub blocked_markers: Vec<String>,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            blocked_paths: vec![DEFAULT_BLOCKED_PATH.to_string()],
            blocked_markers: vec![DEFAULT_BLOCKED_MARKER.to_string()],
        }
    }
}

impl From<&ScopeConfig> for ScopeRules {
    fn from(config: &ScopeConfig) -> Self {
        Self {
            blocked_paths: config.blocked_paths.clone(),
            blocked_markers: config.blocked_markers.clone(),
        }
    }
}

/// Marker elements the classifier looks for
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Id of the login form shown when the session has expired
    #[serde(rename = "login-form-id")]
    pub login_form_id: String,

    /// Id of the element wrapping a server stack trace
    #[serde(rename = "stack-trace-id")]
    pub stack_trace_id: String,

    /// Class of inline error messages
    #[serde(rename = "error-class")]
    pub error_class: String,

    /// Class of inline message-box errors
    #[serde(rename = "message-error-class")]
    pub message_error_class: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            login_form_id: "LogonForm".to_string(),
            stack_trace_id: "stackTrace".to_string(),
            error_class: "error".to_string(),
            message_error_class: "message-error".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the markdown report; no report is written when absent
    #[serde(rename = "summary-path")]
    pub summary_path: Option<String>,

    /// Number of leading `uuid` characters used as a statistics key
    #[serde(rename = "stats-prefix-len")]
    pub stats_prefix_len: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            summary_path: None,
            stats_prefix_len: 6,
        }
    }
}
