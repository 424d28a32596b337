//! Collection page extraction
//!
//! Loads a collection page in the shared browser session, scrolls until the
//! lazily-rendered product grid stops growing (or the attempt budget runs
//! out), then reads product anchors into records.

use crate::browser::error::{BrowserError, Result};
use crate::browser::session::BrowserSession;
use crate::config::{BrowserConfig, SiteConfig};
use crate::output::ProductRecord;
use crate::url::resolve_link;
use std::time::Duration;
use tokio::sync::Mutex;
use url::Url;

/// Tunables for scrolling and tile recognition
#[derive(Debug, Clone)]
pub struct ExtractorSettings {
    /// CSS selector for product tile anchors
    pub product_selector: String,

    /// Substring a tile's link must contain to count as a product
    pub product_marker: String,

    /// Upper bound on scroll iterations
    pub max_scroll_attempts: u32,

    /// Wait after each scroll before re-measuring
    pub scroll_settle: Duration,
}

impl ExtractorSettings {
    pub fn from_config(browser: &BrowserConfig, site: &SiteConfig) -> Self {
        Self {
            product_selector: browser.product_selector.clone(),
            product_marker: site.product_marker.clone(),
            max_scroll_attempts: browser.max_scroll_attempts,
            scroll_settle: Duration::from_millis(browser.scroll_settle_ms),
        }
    }
}

/// How the scroll loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOutcome {
    /// Number of scroll-to-bottom steps performed
    pub iterations: u32,

    /// True if the loop stopped because the height stopped changing
    pub settled: bool,

    /// Last measured document height
    pub final_height: u64,
}

/// Result of processing one collection page
#[derive(Debug)]
pub struct Extraction {
    /// Records gathered, including those read before a fault
    pub records: Vec<ProductRecord>,

    /// Scroll result, None if the page failed before scrolling finished
    pub scroll: Option<ScrollOutcome>,

    /// The fault that cut extraction short, if any
    pub error: Option<BrowserError>,
}

/// Drives the browser session over collection pages
///
/// The session is owned here and guarded by a lock, so concurrent collection
/// tasks take turns on the single browser.
pub struct CollectionExtractor {
    session: Mutex<Box<dyn BrowserSession>>,
    settings: ExtractorSettings,
}

impl CollectionExtractor {
    pub fn new(session: Box<dyn BrowserSession>, settings: ExtractorSettings) -> Self {
        Self {
            session: Mutex::new(session),
            settings,
        }
    }

    /// Loads a collection page and extracts its product records
    ///
    /// Never fails: any browser fault is logged and the records gathered so
    /// far are returned alongside it.
    pub async fn extract(&self, collection_url: &Url) -> Extraction {
        let mut session = self.session.lock().await;
        let mut records = Vec::new();
        let mut scroll = None;

        let result = async {
            session.navigate(collection_url.as_str()).await?;

            let outcome = scroll_to_reveal(
                &mut **session,
                self.settings.max_scroll_attempts,
                self.settings.scroll_settle,
            )
            .await?;
            tracing::debug!(
                "Scrolled {} {} time(s) (settled: {}, height: {})",
                collection_url,
                outcome.iterations,
                outcome.settled,
                outcome.final_height
            );
            scroll = Some(outcome);

            collect_products(
                &mut **session,
                &self.settings,
                collection_url,
                &mut records,
            )
            .await
        }
        .await;

        let error = match result {
            Ok(()) => None,
            Err(e) => {
                tracing::error!("Error extracting product links from {}: {}", collection_url, e);
                Some(e)
            }
        };

        Extraction {
            records,
            scroll,
            error,
        }
    }

    /// Releases the browser. Safe to call more than once.
    pub async fn shutdown(&self) -> Result<()> {
        self.session.lock().await.close().await
    }
}

/// Scrolls to the bottom until the document height stops growing
///
/// Performs at most `max_attempts` scroll steps, waiting `settle` after
/// each. Stops as soon as two consecutive height readings are equal.
pub async fn scroll_to_reveal(
    session: &mut dyn BrowserSession,
    max_attempts: u32,
    settle: Duration,
) -> Result<ScrollOutcome> {
    let mut last_height = session.scroll_height().await?;
    let mut iterations = 0;

    while iterations < max_attempts {
        session.scroll_to_bottom().await?;
        iterations += 1;

        if !settle.is_zero() {
            tokio::time::sleep(settle).await;
        }

        let new_height = session.scroll_height().await?;
        if new_height == last_height {
            return Ok(ScrollOutcome {
                iterations,
                settled: true,
                final_height: new_height,
            });
        }
        last_height = new_height;
    }

    Ok(ScrollOutcome {
        iterations,
        settled: false,
        final_height: last_height,
    })
}

/// Reads product tiles into `records`
///
/// Records are pushed as they are read, so on error `records` holds every
/// product seen before the fault.
pub async fn collect_products(
    session: &mut dyn BrowserSession,
    settings: &ExtractorSettings,
    collection_url: &Url,
    records: &mut Vec<ProductRecord>,
) -> Result<()> {
    let anchors = session.find_anchors(&settings.product_selector).await?;
    tracing::debug!(
        "Found {} tiles matching '{}' on {}",
        anchors.len(),
        settings.product_selector,
        collection_url
    );

    for anchor in anchors {
        let href = match anchor.attribute("href").await? {
            Some(href) => href,
            None => continue,
        };

        let product_url = match resolve_link(&href, collection_url) {
            Ok(url) => url,
            Err(_) => continue,
        };

        if !product_url.as_str().contains(&settings.product_marker) {
            continue;
        }

        let title = match anchor.attribute("title").await? {
            Some(title) if !title.trim().is_empty() => title.trim().to_string(),
            _ => anchor
                .inner_text()
                .await?
                .map(|text| text.trim().to_string())
                .unwrap_or_default(),
        };

        records.push(ProductRecord {
            url: product_url.to_string(),
            collection_url: collection_url.to_string(),
            title,
        });
    }

    Ok(())
}
