//! HTTP fetcher implementation
//!
//! This module defines the `PageClient` capability the coordinator fetches
//! pages through, and the reqwest-backed `HttpClient` used against real sites.
//!
//! The client owns the I/O boundary: it issues the request, parses the body,
//! and hands the parsed document to a callback exactly once before returning.
//! The document never outlives that call, so it is never held across an await.

use crate::config::{CrawlerConfig, SiteConfig};
use crate::SmokeError;
use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;
use std::time::{Duration, Instant};

/// Callback receiving `(status, url, document)` for a fetched page
///
/// Invoked at most once, before the enclosing `request_url` call returns.
pub type DocumentCallback<'a> = Box<dyn FnOnce(u16, &str, &Html) + Send + 'a>;

/// Capability to fetch a page and expose its parsed document
#[async_trait]
pub trait PageClient: Send + Sync {
    /// Requests `url` and passes the parsed response to `on_document`
    ///
    /// # Returns
    ///
    /// * `Ok(u16)` - The HTTP status of the response
    /// * `Err(SmokeError)` - The page could not be fetched or read
    async fn request_url(
        &self,
        url: &str,
        on_document: DocumentCallback<'_>,
    ) -> Result<u16, SmokeError>;
}

/// reqwest-backed client that keeps session cookies between requests
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    credentials: Option<(String, String)>,
}

impl HttpClient {
    /// Builds a client from the site and crawler configuration
    ///
    /// The client carries a cookie store so that a session established by
    /// the first pages survives for the rest of the crawl. When credentials
    /// are configured, every request sends them as HTTP basic auth.
    pub fn new(site: &SiteConfig, crawler: &CrawlerConfig) -> Result<Self, SmokeError> {
        let mut builder = Client::builder()
            .user_agent(crawler.user_agent.as_str())
            .cookie_store(true)
            .gzip(true)
            .brotli(true);

        if let Some(secs) = crawler.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let credentials = site
            .user
            .as_ref()
            .map(|user| (user.clone(), site.password.clone().unwrap_or_default()));

        Ok(Self {
            client: builder.build()?,
            credentials,
        })
    }
}

#[async_trait]
impl PageClient for HttpClient {
    async fn request_url(
        &self,
        url: &str,
        on_document: DocumentCallback<'_>,
    ) -> Result<u16, SmokeError> {
        let started = Instant::now();

        let mut request = self.client.get(url);
        if let Some((user, password)) = &self.credentials {
            request = request.basic_auth(user, Some(password));
        }

        tracing::debug!("-> GET {}", url);

        let response = request.send().await.map_err(|source| SmokeError::Http {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();

        tracing::debug!(
            "<- {}, Time: {:?}, Length: {} :: {}",
            status,
            started.elapsed(),
            response
                .content_length()
                .map(|len| len.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            url
        );
        tracing::trace!("<- headers for {}: {:?}", url, response.headers());

        let body = response.text().await.map_err(|source| SmokeError::Body {
            url: url.to_string(),
            source,
        })?;

        {
            let document = Html::parse_document(&body);
            on_document(status.as_u16(), url, &document);
        }

        Ok(status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site_config() -> SiteConfig {
        SiteConfig {
            base_url: "http://localhost:8080".to_string(),
            seed: "/".to_string(),
            user: Some("admin".to_string()),
            password: Some("secret".to_string()),
        }
    }

    #[test]
    fn test_build_http_client() {
        let client = HttpClient::new(&site_config(), &CrawlerConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_credentials_from_config() {
        let client = HttpClient::new(&site_config(), &CrawlerConfig::default()).unwrap();
        assert_eq!(
            client.credentials,
            Some(("admin".to_string(), "secret".to_string()))
        );
    }

    #[test]
    fn test_no_credentials_without_user() {
        let mut site = site_config();
        site.user = None;
        let client = HttpClient::new(&site, &CrawlerConfig::default()).unwrap();
        assert!(client.credentials.is_none());
    }

    #[tokio::test]
    async fn test_transport_error_skips_callback() {
        let crawler = CrawlerConfig {
            request_timeout_secs: Some(2),
            ..CrawlerConfig::default()
        };
        let client = HttpClient::new(&site_config(), &crawler).unwrap();

        let mut called = false;
        let result = client
            .request_url("http://127.0.0.1:1/", Box::new(|_: u16, _: &str, _: &Html| called = true))
            .await;

        assert!(matches!(result, Err(SmokeError::Http { .. })));
        assert!(!called);
    }
}
