use url::Url;

/// Logout/reset path that ends the session when visited
pub const DEFAULT_BLOCKED_PATH: &str = "/fx/";

/// Query marker the target application uses to kill the session
pub const DEFAULT_BLOCKED_MARKER: &str = "fckdsh";

/// Site-specific exclusions applied on top of the same-origin check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeRules {
    /// Paths that are never crawled (exact match)
    pub blocked_paths: Vec<String>,

    /// Substrings that exclude any URL whose serialized form contains them
    pub blocked_markers: Vec<String>,
}

impl Default for ScopeRules {
    fn default() -> Self {
        Self {
            blocked_paths: vec![DEFAULT_BLOCKED_PATH.to_string()],
            blocked_markers: vec![DEFAULT_BLOCKED_MARKER.to_string()],
        }
    }
}

impl ScopeRules {
    /// Rules with no blocked paths or markers
    pub fn none() -> Self {
        Self {
            blocked_paths: Vec::new(),
            blocked_markers: Vec::new(),
        }
    }

    fn is_blocked(&self, url: &Url) -> bool {
        self.blocked_paths.iter().any(|p| url.path() == p)
            || self
                .blocked_markers
                .iter()
                .any(|m| !m.is_empty() && url.as_str().contains(m.as_str()))
    }
}

/// Checks whether a canonical URL may be crawled
///
/// A URL is in scope when it shares scheme, host and port with the site root
/// and is not excluded by `rules`.
///
/// # Examples
///
/// ```
/// use site_smoke::url::{in_scope, ScopeRules};
/// use url::Url;
///
/// let site = Url::parse("http://localhost:8080/").unwrap();
/// let rules = ScopeRules::default();
///
/// let page = Url::parse("http://localhost:8080/pkg/").unwrap();
/// assert!(in_scope(&site, Some(&page), &rules));
///
/// let logout = Url::parse("http://localhost:8080/fx/").unwrap();
/// assert!(!in_scope(&site, Some(&logout), &rules));
/// assert!(!in_scope(&site, None, &rules));
/// ```
pub fn in_scope(site: &Url, candidate: Option<&Url>, rules: &ScopeRules) -> bool {
    let Some(url) = candidate else {
        return false;
    };

    url.scheme() == site.scheme()
        && url.host() == site.host()
        && url.port_or_known_default() == site.port_or_known_default()
        && !rules.is_blocked(url)
}
