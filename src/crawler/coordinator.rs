//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Seeding the frontier from the start URLs
//! - Dispatching page and collection tasks to workers
//! - Feeding walker output back into the frontier
//! - Tearing down the browser on every exit path
//! - Writing the JSON feed

use crate::browser::{BrowserSession, ChromiumSession, CollectionExtractor, Extraction, ExtractorSettings};
use crate::config::Config;
use crate::crawler::frontier::{Dispatch, FrontierWalker};
use crate::crawler::parser::parse_html;
use crate::crawler::scheduler::{CrawlTask, NextTask, Scheduler, TaskKind};
use crate::crawler::{build_http_client, fetch_url, FetchResult};
use crate::output::{CrawlStatistics, JsonFeedWriter, OutputHandler, ProductRecord};
use crate::robots::{fetch_robots, origin_of, RobotsCache};
use crate::url::canonicalize;
use crate::CrawlError;
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use url::Url;

/// Everything a finished run produced
#[derive(Debug)]
pub struct CrawlReport {
    /// Product records in the order they were extracted
    pub records: Vec<ProductRecord>,

    pub stats: CrawlStatistics,

    /// Size of the visited set at the end of the run
    pub visited: usize,
}

/// What a worker task reports back to the coordinator
#[derive(Debug)]
enum TaskOutcome {
    /// Page fetched and its links classified
    Walked {
        url: Url,
        title: Option<String>,
        depth: u32,
        dispatch: Dispatch,
    },

    /// Redirected to a URL that had already been visited
    DuplicateRedirect { url: Url, final_url: Url },

    PageFailed { url: Url, reason: String },

    Extracted { url: Url, extraction: Extraction },

    RobotsDenied { url: Url },
}

/// State shared by all worker tasks
struct CrawlContext {
    client: Client,
    walker: FrontierWalker,
    extractor: CollectionExtractor,
    user_agent: String,
    /// Present only when robots.txt is obeyed
    robots: Option<Mutex<RobotsCache>>,
}

impl CrawlContext {
    async fn process(&self, task: CrawlTask) -> TaskOutcome {
        if !self.robots_allows(&task.url).await {
            return TaskOutcome::RobotsDenied { url: task.url };
        }

        match task.kind {
            TaskKind::Page => self.process_page(task.url, task.depth).await,
            TaskKind::Collection => {
                tracing::info!("Processing collection page: {}", task.url);
                let extraction = self.extractor.extract(&task.url).await;
                TaskOutcome::Extracted {
                    url: task.url,
                    extraction,
                }
            }
        }
    }

    async fn process_page(&self, url: Url, depth: u32) -> TaskOutcome {
        tracing::debug!("Fetching {} (depth {})", url, depth);

        match fetch_url(&self.client, url.as_str()).await {
            FetchResult::Success {
                final_url, body, ..
            } => {
                let base = Url::parse(&final_url).unwrap_or_else(|_| url.clone());

                // A redirect onto a page reached some other way is not walked twice
                if canonicalize(&base) != canonicalize(&url) && !self.walker.mark_visited(&base) {
                    return TaskOutcome::DuplicateRedirect {
                        url,
                        final_url: base,
                    };
                }

                let parsed = parse_html(&body);
                let dispatch = self.walker.walk(&base, &parsed.hrefs, depth);

                TaskOutcome::Walked {
                    url: base,
                    title: parsed.title,
                    depth,
                    dispatch,
                }
            }
            FetchResult::ContentMismatch { content_type } => TaskOutcome::PageFailed {
                url,
                reason: format!("Expected HTML, got {}", content_type),
            },
            FetchResult::HttpError { status_code } => TaskOutcome::PageFailed {
                url,
                reason: format!("HTTP {}", status_code),
            },
            FetchResult::NetworkError { error } => TaskOutcome::PageFailed { url, reason: error },
        }
    }

    /// Checks robots.txt for the URL's origin, fetching it on first use
    ///
    /// The cache lock is held across the fetch so concurrent first requests
    /// to one origin share a single robots.txt download.
    async fn robots_allows(&self, url: &Url) -> bool {
        let cache = match &self.robots {
            Some(cache) => cache,
            None => return true,
        };

        let origin = origin_of(url);
        let mut cache = cache.lock().await;
        if let Some(robots) = cache.get_fresh(&origin) {
            return robots.is_allowed(url.as_str(), &self.user_agent);
        }

        tracing::debug!("Fetching robots.txt for {}", origin);
        let robots = fetch_robots(&self.client, url).await;
        let allowed = robots.is_allowed(url.as_str(), &self.user_agent);
        cache.insert(&origin, robots);
        allowed
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    context: Arc<CrawlContext>,
    scheduler: Scheduler,
    start_urls: Vec<String>,
    stats: CrawlStatistics,
    records: Vec<ProductRecord>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// The browser session is owned by the coordinator from here on and is
    /// closed when [`Coordinator::run`] returns, whatever the outcome.
    ///
    /// # Arguments
    ///
    /// * `config` - The validated run configuration
    /// * `client` - HTTP client for generic pages and robots.txt
    /// * `session` - Browser session used for collection pages
    pub fn new(config: Config, client: Client, session: Box<dyn BrowserSession>) -> Self {
        let walker = FrontierWalker::new(&config.site, &config.crawler);
        let extractor = CollectionExtractor::new(
            session,
            ExtractorSettings::from_config(&config.browser, &config.site),
        );
        let robots = config
            .crawler
            .obey_robots
            .then(|| Mutex::new(RobotsCache::new()));

        let context = CrawlContext {
            client,
            walker,
            extractor,
            user_agent: config.crawler.user_agent.clone(),
            robots,
        };

        Self {
            context: Arc::new(context),
            scheduler: Scheduler::new(config.crawler.clone()),
            start_urls: config.site.start_urls.clone(),
            stats: CrawlStatistics::new(),
            records: Vec::new(),
        }
    }

    /// Runs the crawl to completion
    ///
    /// The browser is shut down before this returns, on success and on error.
    pub async fn run(mut self) -> Result<CrawlReport, CrawlError> {
        let result = self.drive().await;

        if let Err(e) = self.context.extractor.shutdown().await {
            tracing::warn!("Browser shutdown failed: {}", e);
        }

        result?;
        self.stats.finish();

        tracing::info!(
            "Crawl completed: {} pages fetched, {} collections, {} products in {}s",
            self.stats.pages_fetched,
            self.stats.collections_processed,
            self.stats.products_found,
            self.stats.duration_seconds().unwrap_or(0)
        );

        Ok(CrawlReport {
            records: self.records,
            stats: self.stats,
            visited: self.context.walker.visited().len(),
        })
    }

    /// Seeds the frontier and drains it with a bounded pool of workers
    async fn drive(&mut self) -> Result<(), CrawlError> {
        self.seed()?;
        tracing::info!("Starting crawl with {} start URL(s)", self.scheduler.frontier_size());

        let mut workers: JoinSet<TaskOutcome> = JoinSet::new();
        let mut processed: u64 = 0;

        loop {
            // Hand out everything that is ready right now
            let wait = loop {
                match self.scheduler.try_next() {
                    NextTask::Ready(scheduled) => {
                        let context = Arc::clone(&self.context);
                        workers.spawn(async move {
                            let _permit = scheduled.permit;
                            context.process(scheduled.task).await
                        });
                    }
                    NextTask::Wait(duration) => break Some(duration),
                    NextTask::Busy | NextTask::Empty => break None,
                }
            };

            let joined = match (wait, workers.is_empty()) {
                (None, true) => break,
                (Some(duration), true) => {
                    tokio::time::sleep(duration).await;
                    continue;
                }
                (Some(duration), false) => {
                    match tokio::time::timeout(duration, workers.join_next()).await {
                        Ok(joined) => joined,
                        Err(_) => continue,
                    }
                }
                (None, false) => workers.join_next().await,
            };

            if let Some(result) = joined {
                self.handle_outcome(result?);
                processed += 1;

                if processed % 10 == 0 {
                    tracing::info!(
                        "Progress: {} tasks done, {} products, {} in frontier, {} visited",
                        processed,
                        self.records.len(),
                        self.scheduler.frontier_size(),
                        self.context.walker.visited().len()
                    );
                }
            }
        }

        tracing::info!("Frontier is empty, crawl complete");
        Ok(())
    }

    fn seed(&mut self) -> Result<(), CrawlError> {
        for start in &self.start_urls {
            let url = Url::parse(start)?;
            let walker = &self.context.walker;

            if walker.is_collection(&url) {
                if walker.mark_visited(&url) {
                    self.scheduler.push(CrawlTask::collection(url, 0));
                }
            } else if walker.mark_seed(&url) {
                self.scheduler.push(CrawlTask::page(url, 0));
            }
        }
        Ok(())
    }

    fn handle_outcome(&mut self, outcome: TaskOutcome) {
        match outcome {
            TaskOutcome::Walked {
                url,
                title,
                depth,
                dispatch,
            } => {
                self.stats.pages_fetched += 1;
                tracing::debug!(
                    "Walked {} ({}): {} collections, {} links, {} ignored",
                    url,
                    title.as_deref().unwrap_or("untitled"),
                    dispatch.collections.len(),
                    dispatch.generics.len(),
                    dispatch.ignored.len()
                );

                for (_, reason) in &dispatch.ignored {
                    self.stats.record_ignored(reason.label());
                }
                for collection in dispatch.collections {
                    self.scheduler.push(CrawlTask::collection(collection, depth + 1));
                }
                for page in dispatch.generics {
                    self.scheduler.push(CrawlTask::page(page, depth + 1));
                }
            }
            TaskOutcome::DuplicateRedirect { url, final_url } => {
                tracing::debug!("{} redirected to already visited {}", url, final_url);
            }
            TaskOutcome::PageFailed { url, reason } => {
                self.stats.pages_failed += 1;
                tracing::warn!("Failed to fetch {}: {}", url, reason);
            }
            TaskOutcome::Extracted { url, extraction } => {
                self.stats.collections_processed += 1;
                if extraction.error.is_some() {
                    self.stats.extraction_failures += 1;
                }
                self.stats.products_found += extraction.records.len() as u64;
                tracing::info!(
                    "Extracted {} product(s) from {}",
                    extraction.records.len(),
                    url
                );
                self.records.extend(extraction.records);
            }
            TaskOutcome::RobotsDenied { url } => {
                self.stats.robots_denied += 1;
                tracing::info!("URL {} disallowed by robots.txt", url);
            }
        }
    }
}

/// Runs a complete crawl and writes the JSON feed
///
/// 1. Build the HTTP client
/// 2. Launch the browser
/// 3. Crawl until the frontier drains
/// 4. Write all product records to the output file
///
/// A browser launch failure ends the run before anything is fetched.
///
/// # Example
///
/// ```no_run
/// use shelf_crawl::config::Config;
/// use shelf_crawl::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_crawl(Config::default()).await?;
/// println!("{} products", report.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlReport, CrawlError> {
    let client = build_http_client(&config.crawler)?;
    let session = ChromiumSession::launch(&config.browser, &config.crawler.user_agent).await?;

    let mut writer = JsonFeedWriter::new(config.output.path.clone(), config.output.pretty);
    let report = Coordinator::new(config, client, Box::new(session)).run().await?;
    writer.write_records(&report.records)?;

    Ok(report)
}
