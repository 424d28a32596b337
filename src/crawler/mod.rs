//! Crawler module for storefront traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching of generic pages
//! - HTML parsing and link extraction
//! - Link classification and the run-wide visited set
//! - Request scheduling and rate limiting
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod scheduler;

pub use coordinator::{run_crawl, Coordinator, CrawlReport};
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use frontier::{Dispatch, FrontierWalker, IgnoreReason, Insertion, LinkClass, VisitedSet};
pub use parser::{parse_html, ParsedPage};
pub use scheduler::{CrawlTask, NextTask, ScheduledTask, Scheduler, TaskKind};
