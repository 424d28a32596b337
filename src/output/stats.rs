//! Run statistics
//!
//! Counters gathered by the coordinator while a crawl runs, printed when it
//! finishes.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished (None while running)
    pub finished_at: Option<DateTime<Utc>>,

    /// Generic pages fetched and parsed
    pub pages_fetched: u64,

    /// Generic pages that could not be fetched or were not HTML
    pub pages_failed: u64,

    /// Collection pages handed to the browser
    pub collections_processed: u64,

    /// Collection pages whose extraction faulted part-way
    pub extraction_failures: u64,

    /// Product records emitted
    pub products_found: u64,

    /// URLs skipped because robots.txt disallowed them
    pub robots_denied: u64,

    /// Links dropped by the walker, keyed by reason
    pub links_ignored: BTreeMap<String, u64>,
}

impl CrawlStatistics {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            pages_fetched: 0,
            pages_failed: 0,
            collections_processed: 0,
            extraction_failures: 0,
            products_found: 0,
            robots_denied: 0,
            links_ignored: BTreeMap::new(),
        }
    }

    pub fn record_ignored(&mut self, reason: &str) {
        *self.links_ignored.entry(reason.to_string()).or_insert(0) += 1;
    }

    pub fn total_ignored(&self) -> u64 {
        self.links_ignored.values().sum()
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Run duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

impl Default for CrawlStatistics {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints statistics to stdout in a human-readable format
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Started: {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        println!("Finished: {}", finished.to_rfc3339());
    }
    if let Some(secs) = stats.duration_seconds() {
        println!("Duration: {}s", secs);
    }

    println!("\nPages fetched: {}", stats.pages_fetched);
    println!("Pages failed: {}", stats.pages_failed);
    println!("Collections processed: {}", stats.collections_processed);
    println!("Extraction failures: {}", stats.extraction_failures);
    println!("Products found: {}", stats.products_found);
    if stats.robots_denied > 0 {
        println!("Denied by robots.txt: {}", stats.robots_denied);
    }

    if !stats.links_ignored.is_empty() {
        println!("\nLinks ignored ({}):", stats.total_ignored());
        for (reason, count) in &stats.links_ignored {
            println!("  {:<20} {}", reason, count);
        }
    }

    println!();
}
