use url::Url;

/// Query parameters that select different content on the target application
///
/// Every other parameter (session ids, tracking tokens, cache busters) is
/// discarded during canonicalization. The list is kept in key order so the
/// re-encoded query is deterministic.
pub const KEPT_QUERY_PARAMS: &[&str] = &["activeComponent", "uuid"];

/// Canonicalizes a raw href against the site root
///
/// # Canonicalization Steps
///
/// 1. Reject empty hrefs and fragment-only hrefs (`#`, `#section`)
/// 2. Resolve against the site root (absolute hrefs keep their own host)
/// 3. Reduce the query to `activeComponent` and `uuid`, in that order;
///    parameters with empty values are dropped, an empty query is removed
/// 4. Remove the fragment
///
/// # Arguments
///
/// * `site` - The site root the crawl is scoped to
/// * `raw` - The href as it appeared in the page
///
/// # Returns
///
/// * `Some(Url)` - The canonical absolute URL
/// * `None` - The href never identifies a resource or cannot be parsed
///
/// # Examples
///
/// ```
/// use site_smoke::url::canonicalize;
/// use url::Url;
///
/// let site = Url::parse("http://localhost:8080/").unwrap();
///
/// let url = canonicalize(&site, "reports?uuid=42&activeComponent=Main&session=abc#top").unwrap();
/// assert_eq!(url.as_str(), "http://localhost:8080/reports?activeComponent=Main&uuid=42");
///
/// assert!(canonicalize(&site, "#top").is_none());
/// ```
pub fn canonicalize(site: &Url, raw: &str) -> Option<Url> {
    let raw = raw.trim();

    if raw.is_empty() || raw.starts_with('#') {
        return None;
    }

    let mut url = site.join(raw).ok()?;

    if url.query().is_some() {
        let kept = kept_query_params(&url);
        url.set_query(None);

        if !kept.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &kept {
                pairs.append_pair(key, value);
            }
        }
    }

    url.set_fragment(None);

    Some(url)
}

/// Picks the first non-empty value of each kept parameter
fn kept_query_params(url: &Url) -> Vec<(&'static str, String)> {
    KEPT_QUERY_PARAMS
        .iter()
        .filter_map(|&key| {
            url.query_pairs()
                .find(|(k, v)| k == key && !v.is_empty())
                .map(|(_, v)| (key, v.into_owned()))
        })
        .collect()
}
