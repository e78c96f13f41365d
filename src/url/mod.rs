//! URL handling module for Site-Smoke
//!
//! This module decides what counts as "the same page" (canonicalization) and
//! what counts as "part of the site" (scope validation). Both are pure
//! functions of the site root and the candidate href.

mod normalize;
mod scope;

// Re-export main functions
pub use normalize::{canonicalize, KEPT_QUERY_PARAMS};
pub use scope::{in_scope, ScopeRules, DEFAULT_BLOCKED_MARKER, DEFAULT_BLOCKED_PATH};

use url::Url;

/// Canonicalizes `raw` against `site` and keeps it only if it is in scope
///
/// This is the combined check the coordinator applies to every discovered
/// link before it consults the visited registry.
///
/// # Examples
///
/// ```
/// use site_smoke::url::{resolve_in_scope, ScopeRules};
/// use url::Url;
///
/// let site = Url::parse("http://localhost:8080/").unwrap();
/// let rules = ScopeRules::default();
///
/// let page = resolve_in_scope(&site, "/pkg/#top", &rules).unwrap();
/// assert_eq!(page.as_str(), "http://localhost:8080/pkg/");
///
/// assert!(resolve_in_scope(&site, "http://elsewhere/pkg/", &rules).is_none());
/// ```
pub fn resolve_in_scope(site: &Url, raw: &str, rules: &ScopeRules) -> Option<Url> {
    let candidate = canonicalize(site, raw);
    if in_scope(site, candidate.as_ref(), rules) {
        candidate
    } else {
        tracing::trace!("Dropping out-of-scope link: {}", raw);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> Url {
        Url::parse("http://localhost:8080/").unwrap()
    }

    #[test]
    fn test_resolve_relative_link() {
        let url = resolve_in_scope(&site(), "pkg/fmt/", &ScopeRules::default()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/pkg/fmt/");
    }

    #[test]
    fn test_resolve_rejects_fragment_only() {
        assert!(resolve_in_scope(&site(), "#top", &ScopeRules::default()).is_none());
    }

    #[test]
    fn test_resolve_rejects_blocked_path() {
        assert!(resolve_in_scope(&site(), "/fx/", &ScopeRules::default()).is_none());
    }

    #[test]
    fn test_resolve_rejects_javascript_href() {
        assert!(resolve_in_scope(&site(), "javascript:void(0)", &ScopeRules::default()).is_none());
    }
}
