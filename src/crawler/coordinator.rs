//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator runs one breadth-first sweep over a single site:
//! - The visited registry, the pending backlog and the outstanding counter are
//!   owned by the coordinating loop and never touched by fetch tasks
//! - Fetch tasks run concurrently, bounded by a fixed-size admission pool, and
//!   report back through a single completion channel
//! - A URL enters the visited registry when it is scheduled, not when its
//!   fetch completes, so two pages linking to it never schedule it twice
//!
//! Per-page failures never abort the sweep: a page that cannot be fetched is
//! counted as visited and contributes no links. A fetch task that panics is
//! treated the same way.

use crate::config::Config;
use crate::crawler::classifier::{Classification, Classifier};
use crate::crawler::fetcher::PageClient;
use crate::output::Observer;
use crate::url::{resolve_in_scope, ScopeRules};
use crate::SmokeError;
use scraper::Html;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;
use url::Url;

/// Settings fixed for the lifetime of a coordinator
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Site root defining the crawl scope (scheme + host)
    pub site: String,

    /// Maximum number of fetches in flight at once
    pub max_parallel_requests: usize,

    /// Maximum link distance from the seed; `None` means unbounded
    pub max_depth: Option<u32>,

    /// Site-specific exclusions
    pub scope: ScopeRules,
}

impl CrawlSettings {
    /// Creates settings for `site` with two parallel requests, no depth limit
    /// and the default scope rules
    pub fn new(site: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            max_parallel_requests: 2,
            max_depth: None,
            scope: ScopeRules::default(),
        }
    }

    /// Sets the admission pool size
    pub fn with_max_parallel_requests(mut self, max: usize) -> Self {
        self.max_parallel_requests = max;
        self
    }

    /// Sets the depth limit (`None` for unbounded)
    pub fn with_max_depth(mut self, max_depth: Option<u32>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Replaces the scope rules
    pub fn with_scope(mut self, scope: ScopeRules) -> Self {
        self.scope = scope;
        self
    }

    fn expands(&self, depth: u32) -> bool {
        self.max_depth.map_or(true, |max| depth <= max)
    }
}

impl From<&Config> for CrawlSettings {
    fn from(config: &Config) -> Self {
        Self {
            site: config.site.base_url.clone(),
            max_parallel_requests: config.crawler.max_parallel_requests,
            max_depth: config.crawler.depth_limit(),
            scope: ScopeRules::from(&config.scope),
        }
    }
}

/// Result of one completed fetch, handed back to the coordinating loop
#[derive(Debug)]
pub struct WorkItem {
    /// Raw hrefs found on the page; `None` when the fetch itself failed
    pub links: Option<Vec<String>>,

    /// Depth at which the discovered links would be scheduled
    pub depth: u32,
}

/// A URL admitted to the visited registry and waiting for a pool slot
#[derive(Debug)]
struct PendingFetch {
    id: usize,
    url: Url,
    depth: u32,
}

/// Stateless per-call collaborators shared by all fetch tasks
struct PageVisitor {
    client: Arc<dyn PageClient>,
    classifier: Arc<dyn Classifier>,
    observer: Option<Arc<dyn Observer>>,
}

impl PageVisitor {
    /// Fetches and classifies one page, notifying the observer on success
    async fn visit(&self, url: &str) -> Result<Vec<String>, SmokeError> {
        let mut page: Option<Classification> = None;
        let classifier = &self.classifier;

        let status = self
            .client
            .request_url(
                url,
                Box::new(|status: u16, page_url: &str, document: &Html| {
                    page = Some(classifier.classify(status, page_url, document));
                }),
            )
            .await?;

        let Classification { links, errors } = page.unwrap_or_default();

        if let Some(observer) = &self.observer {
            observer.on_visited(status, url, &links, &errors);
        }

        Ok(links)
    }

    /// Body of a fetch task: holds one pool slot for the duration of the fetch
    async fn fetch(
        self: Arc<Self>,
        permit: OwnedSemaphorePermit,
        pending: PendingFetch,
        completions: UnboundedSender<WorkItem>,
    ) {
        let outcome = self.visit(pending.url.as_str()).await;
        drop(permit);

        let links = match outcome {
            Ok(links) => {
                tracing::debug!(
                    "[{}] {}, depth: {}, more: {}",
                    pending.id,
                    pending.url,
                    pending.depth,
                    links.len()
                );
                Some(links)
            }
            Err(e) => {
                tracing::warn!("[{}] error - {}", pending.id, e);
                None
            }
        };

        let item = WorkItem {
            links,
            depth: pending.depth + 1,
        };

        if completions.send(item).is_err() {
            tracing::error!("[{}] coordinator gone, dropping result", pending.id);
        }
    }
}

/// State of a single crawl invocation, discarded when it returns
struct CrawlRun<'a> {
    site: Url,
    settings: &'a CrawlSettings,
    visitor: Arc<PageVisitor>,
    pool: Arc<Semaphore>,
    visited: HashSet<String>,
    backlog: VecDeque<PendingFetch>,
    outstanding: usize,
    next_id: usize,
    sender: UnboundedSender<WorkItem>,
    completions: UnboundedReceiver<WorkItem>,
    tasks: JoinSet<()>,
}

impl<'a> CrawlRun<'a> {
    fn new(site: Url, settings: &'a CrawlSettings, visitor: Arc<PageVisitor>) -> Self {
        let (sender, completions) = unbounded_channel();

        Self {
            site,
            settings,
            visitor,
            pool: Arc::new(Semaphore::new(settings.max_parallel_requests.max(1))),
            visited: HashSet::new(),
            backlog: VecDeque::new(),
            outstanding: 0,
            next_id: 0,
            sender,
            completions,
            tasks: JoinSet::new(),
        }
    }

    /// Admits a canonical URL unless it was already scheduled
    fn schedule(&mut self, url: Url, depth: u32) {
        if !self.visited.insert(url.as_str().to_string()) {
            return;
        }

        self.next_id += 1;
        self.outstanding += 1;
        self.backlog.push_back(PendingFetch {
            id: self.next_id,
            url,
            depth,
        });
    }

    /// Starts fetch tasks for as many backlog entries as the pool admits
    fn dispatch(&mut self) {
        while !self.backlog.is_empty() {
            let Ok(permit) = Arc::clone(&self.pool).try_acquire_owned() else {
                break;
            };

            if let Some(pending) = self.backlog.pop_front() {
                self.tasks.spawn(Arc::clone(&self.visitor).fetch(
                    permit,
                    pending,
                    self.sender.clone(),
                ));
            }
        }
    }

    /// Schedules the in-scope links of a completed page
    fn expand(&mut self, item: WorkItem) {
        let Some(links) = item.links else {
            return;
        };

        if !self.settings.expands(item.depth) {
            return;
        }

        for link in links {
            if let Some(url) = resolve_in_scope(&self.site, &link, &self.settings.scope) {
                self.schedule(url, item.depth);
            }
        }
    }

    /// Waits for the next fetch result
    ///
    /// A task that ends without reporting (it panicked) yields a failed item,
    /// so the outstanding count still reaches zero.
    async fn next_completion(&mut self) -> WorkItem {
        loop {
            tokio::select! {
                Some(item) = self.completions.recv() => return item,
                Some(joined) = self.tasks.join_next() => {
                    if let Err(e) = joined {
                        tracing::warn!("fetch task aborted - {}", e);
                        return WorkItem { links: None, depth: 0 };
                    }
                }
            }
        }
    }

    /// Runs until every scheduled fetch has reported back
    async fn drive(mut self) -> usize {
        let start_time = Instant::now();
        let mut completed = 0usize;

        while self.outstanding > 0 {
            self.dispatch();

            let item = self.next_completion().await;

            self.outstanding -= 1;
            completed += 1;
            self.expand(item);

            if completed % 10 == 0 {
                let rate = completed as f64 / start_time.elapsed().as_secs_f64();
                tracing::info!(
                    "Progress: {} pages crawled, {} waiting, {} scheduled, {:.2} pages/sec",
                    completed,
                    self.backlog.len(),
                    self.visited.len(),
                    rate
                );
            }
        }

        tracing::info!(
            "Crawl completed: {} pages visited in {:?}",
            self.visited.len(),
            start_time.elapsed()
        );

        self.visited.len()
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    settings: CrawlSettings,
    visitor: Arc<PageVisitor>,
}

impl Coordinator {
    /// Creates a new coordinator
    ///
    /// # Arguments
    ///
    /// * `settings` - Site root, pool size, depth limit and scope rules
    /// * `client` - Fetches pages and exposes their parsed documents
    /// * `classifier` - Turns documents into links and errors
    pub fn new(
        settings: CrawlSettings,
        client: Arc<dyn PageClient>,
        classifier: Arc<dyn Classifier>,
    ) -> Self {
        Self {
            settings,
            visitor: Arc::new(PageVisitor {
                client,
                classifier,
                observer: None,
            }),
        }
    }

    /// Attaches an observer notified once per completed fetch
    pub fn with_observer(self, observer: Arc<dyn Observer>) -> Self {
        let visitor = PageVisitor {
            client: Arc::clone(&self.visitor.client),
            classifier: Arc::clone(&self.visitor.classifier),
            observer: Some(observer),
        };

        Self {
            settings: self.settings,
            visitor: Arc::new(visitor),
        }
    }

    /// Crawls the site from `seed` and returns the number of distinct pages visited
    ///
    /// An unparsable site root or a seed that is rejected by canonicalization
    /// or scope validation yields `0`; the reason is logged.
    pub async fn crawl(&self, seed: &str) -> usize {
        match self.run(seed).await {
            Ok(visited) => visited,
            Err(e) => {
                tracing::error!("Crawl not started: {}", e);
                0
            }
        }
    }

    /// Crawls the site from `seed`, reporting configuration failures as errors
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of distinct pages visited
    /// * `Err(SmokeError::InvalidSite)` - The site root cannot be parsed
    /// * `Err(SmokeError::SeedRejected)` - The seed is empty, unparsable or out of scope
    pub async fn run(&self, seed: &str) -> Result<usize, SmokeError> {
        let site = Url::parse(&self.settings.site)
            .map_err(|e| SmokeError::InvalidSite(format!("{}: {}", self.settings.site, e)))?;

        let seed_url = resolve_in_scope(&site, seed, &self.settings.scope)
            .ok_or_else(|| SmokeError::SeedRejected(seed.to_string()))?;

        tracing::info!(
            "Starting crawl of {} from {} (parallel: {}, depth: {})",
            site,
            seed_url,
            self.settings.max_parallel_requests,
            self.settings
                .max_depth
                .map_or_else(|| "unbounded".to_string(), |d| d.to_string())
        );

        let mut run = CrawlRun::new(site, &self.settings, Arc::clone(&self.visitor));
        run.schedule(seed_url, 0);

        Ok(run.drive().await)
    }
}
