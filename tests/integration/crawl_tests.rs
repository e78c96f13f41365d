//! Integration tests for the crawler
//!
//! These tests use wiremock to serve HTML fixtures and run the real
//! `HttpClient` and `PageClassifier` through the `Coordinator` end-to-end.

use site_smoke::config::{parse_config, Config, CrawlerConfig, SiteConfig};
use site_smoke::crawler::{crawl, Coordinator, CrawlSettings, HttpClient, PageClassifier};
use site_smoke::output::{ObserverSet, ReportObserver, UuidPrefixStats};
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Renders a page with one anchor per href
fn page_with_links(links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!("<html><head><title>t</title></head><body>{}</body></html>", anchors)
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, page: &str, links: &[&str]) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(page_with_links(links)))
        .expect(1)
        .mount(server)
        .await;
}

/// The four-page graph also used by the unit tests; `/cmd/` is not served
async fn mount_golang_site(server: &MockServer) {
    mount_page(server, "/", &["/pkg/", "/cmd/"]).await;
    mount_page(server, "/pkg/", &["/", "/cmd/", "/pkg/fmt/", "/pkg/os/"]).await;
    mount_page(server, "/pkg/fmt/", &["/", "/pkg/"]).await;
    mount_page(server, "/pkg/os/", &["/", "/pkg/"]).await;
}

fn test_config(base_url: &str, max_depth: i64) -> Config {
    parse_config(&format!(
        r#"
[site]
base-url = "{}"

[crawler]
max-parallel-requests = 2
max-depth = {}
request-timeout-secs = 5
"#,
        base_url, max_depth
    ))
    .expect("valid test configuration")
}

fn coordinator_for(config: &Config) -> Coordinator {
    let client = HttpClient::new(&config.site, &config.crawler).expect("client builds");
    Coordinator::new(
        CrawlSettings::from(config),
        Arc::new(client),
        Arc::new(PageClassifier::default()),
    )
}

#[tokio::test]
async fn test_full_crawl_unbounded_depth() {
    let server = MockServer::start().await;
    mount_golang_site(&server).await;

    let config = test_config(&server.uri(), -1);
    let report = Arc::new(ReportObserver::new(server.uri()));

    let visited = crawl(&config, report.clone()).await.unwrap();

    assert_eq!(visited, 5);
    assert_eq!(report.recorded(), 5);

    // Every served page was requested exactly once
    server.verify().await;
}

#[tokio::test]
async fn test_crawl_depth_zero_visits_seed_only() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/pkg/", "/cmd/"]).await;

    let config = test_config(&server.uri(), 0);
    let visited = coordinator_for(&config).crawl("/").await;

    assert_eq!(visited, 1);
}

#[tokio::test]
async fn test_crawl_depth_one() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/pkg/", "/cmd/"]).await;
    mount_page(&server, "/pkg/", &["/", "/cmd/", "/pkg/fmt/", "/pkg/os/"]).await;

    let config = test_config(&server.uri(), 1);
    let visited = coordinator_for(&config).crawl("/").await;

    assert_eq!(visited, 3);
    server.verify().await;
}

#[tokio::test]
async fn test_missing_page_reported_as_broken() {
    let server = MockServer::start().await;
    mount_golang_site(&server).await;

    let config = test_config(&server.uri(), -1);
    let report = Arc::new(ReportObserver::new(server.uri()));
    let visited = crawl(&config, report.clone()).await.unwrap();
    let summary = report.finish(visited, Default::default(), None);

    let broken: Vec<_> = summary.pages_with_errors().collect();
    assert_eq!(broken.len(), 1);
    assert_eq!(broken[0].url, format!("{}/cmd/", server.uri()));
    assert_eq!(broken[0].status, 404);
    assert_eq!(broken[0].errors, vec!["Broken page".to_string()]);
    assert_eq!(summary.status_breakdown().get(&200), Some(&4));
}

#[tokio::test]
async fn test_login_form_stops_expansion() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/private"]).await;

    Mock::given(method("GET"))
        .and(path("/private"))
        .respond_with(html(
            r#"<html><body><form id="LogonForm"></form><a href="/hidden">x</a></body></html>"#
                .to_string(),
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/hidden"))
        .respond_with(html(page_with_links(&[])))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), -1);
    let report = Arc::new(ReportObserver::new(server.uri()));
    let visited = crawl(&config, report.clone()).await.unwrap();
    let summary = report.finish(visited, Default::default(), None);

    assert_eq!(visited, 2);
    let errors: Vec<_> = summary.pages_with_errors().collect();
    assert_eq!(
        errors[0].errors,
        vec![format!("Login form detected at {}/private", server.uri())]
    );
    server.verify().await;
}

#[tokio::test]
async fn test_inline_error_markup_keeps_links() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><body><div id="stackTrace">at Foo.bar()</div><a href="/next">n</a></body></html>"#
                .to_string(),
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(html(
            r#"<html><body><span class="message-error"> Access denied </span></body></html>"#
                .to_string(),
        ))
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), -1);
    let report = Arc::new(ReportObserver::new(server.uri()));
    let visited = crawl(&config, report.clone()).await.unwrap();
    let summary = report.finish(visited, Default::default(), None);

    assert_eq!(visited, 2);
    assert_eq!(summary.total_errors(), 2);

    let mut errors: Vec<String> = summary
        .pages
        .iter()
        .flat_map(|p| p.errors.iter().cloned())
        .collect();
    errors.sort();
    assert_eq!(errors, vec!["Access denied".to_string(), "Broken page".to_string()]);
}

#[tokio::test]
async fn test_onclick_links_followed_unless_confirmed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            concat!(
                "<html><body>",
                "<a href='#' onclick=\"window.open('/popup?uuid=aaaaaa111')\">p</a>",
                "<a href='#' onclick=\"open_in_new_window('/report')\">r</a>",
                "<a href='#' onclick=\"if (confirm('Delete?')) open_in_new_window('/delete')\">d</a>",
                "</body></html>"
            )
            .to_string(),
        ))
        .mount(&server)
        .await;

    mount_page(&server, "/popup", &[]).await;
    mount_page(&server, "/report", &[]).await;

    Mock::given(method("GET"))
        .and(path("/delete"))
        .respond_with(html(page_with_links(&[])))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), -1);
    let stats = Arc::new(UuidPrefixStats::default());
    let visited = crawl(&config, stats.clone()).await.unwrap();

    assert_eq!(visited, 3);
    assert_eq!(stats.snapshot().get("aaaaaa"), Some(&1));
    server.verify().await;
}

#[tokio::test]
async fn test_out_of_scope_links_not_fetched() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        &[
            "http://other.invalid/page",
            "/fx/",
            "/fckdsh/logout",
            "mailto:someone@example.com",
            "/inside",
        ],
    )
    .await;
    mount_page(&server, "/inside", &[]).await;

    Mock::given(method("GET"))
        .and(path("/fx/"))
        .respond_with(html(page_with_links(&[])))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), -1);
    let visited = coordinator_for(&config).crawl("/").await;

    assert_eq!(visited, 2);
    server.verify().await;
}

#[tokio::test]
async fn test_query_variants_collapse_to_one_page() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        &[
            "/obj?uuid=abc&tab=1",
            "/obj?tab=2&uuid=abc",
            "/obj?uuid=abc#details",
        ],
    )
    .await;
    mount_page(&server, "/obj", &[]).await;

    let config = test_config(&server.uri(), -1);
    let visited = coordinator_for(&config).crawl("/").await;

    assert_eq!(visited, 2);
    server.verify().await;
}

#[tokio::test]
async fn test_basic_auth_sent_on_every_request() {
    let server = MockServer::start().await;

    // admin:secret
    for (page, links) in [("/", vec!["/second"]), ("/second", vec!["/"])] {
        Mock::given(method("GET"))
            .and(path(page))
            .and(header("authorization", "Basic YWRtaW46c2VjcmV0"))
            .respond_with(html(page_with_links(&links)))
            .expect(1)
            .mount(&server)
            .await;
    }

    let site = SiteConfig {
        base_url: server.uri(),
        seed: "/".to_string(),
        user: Some("admin".to_string()),
        password: Some("secret".to_string()),
    };
    let client = HttpClient::new(&site, &CrawlerConfig::default()).unwrap();
    let report = Arc::new(ReportObserver::new(server.uri()));
    let coordinator = Coordinator::new(
        CrawlSettings::new(server.uri()),
        Arc::new(client),
        Arc::new(PageClassifier::default()),
    )
    .with_observer(report.clone());

    let visited = coordinator.crawl("/").await;
    let summary = report.finish(visited, Default::default(), None);

    assert_eq!(visited, 2);
    assert_eq!(summary.pages_with_errors().count(), 0);
    server.verify().await;
}

#[tokio::test]
async fn test_session_cookie_kept_between_requests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            html(page_with_links(&["/account"])).insert_header("set-cookie", "SESSION=42; Path=/"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/account"))
        .and(header("cookie", "SESSION=42"))
        .respond_with(html(page_with_links(&[])))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), -1);
    let report = Arc::new(ReportObserver::new(server.uri()));
    let visited = crawl(&config, report.clone()).await.unwrap();
    let summary = report.finish(visited, Default::default(), None);

    assert_eq!(visited, 2);
    assert_eq!(summary.pages_with_errors().count(), 0);
    server.verify().await;
}

#[tokio::test]
async fn test_unreachable_site_counts_seed_as_visited() {
    let config = test_config("http://127.0.0.1:1", -1);
    let report = Arc::new(ReportObserver::new("http://127.0.0.1:1"));

    let visited = crawl(&config, report.clone()).await.unwrap();
    let summary = report.finish(visited, Default::default(), None);

    assert_eq!(visited, 1);
    assert_eq!(report.recorded(), 0);
    assert_eq!(summary.unreachable(), 1);
}

#[tokio::test]
async fn test_rejected_seed_visits_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html(page_with_links(&[])))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), -1);
    let coordinator = coordinator_for(&config);

    assert_eq!(coordinator.crawl("http://other.invalid/").await, 0);
    assert_eq!(coordinator.crawl("#top").await, 0);
    assert_eq!(coordinator.crawl("/fx/").await, 0);
    assert!(crawl(
        &Config {
            site: SiteConfig {
                seed: "".to_string(),
                ..config.site.clone()
            },
            ..config.clone()
        },
        Arc::new(ObserverSet::new()),
    )
    .await
    .is_err());

    server.verify().await;
}
