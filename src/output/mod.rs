//! Output module for crawl results
//!
//! This module handles:
//! - The product record type
//! - Writing the JSON feed at the end of a run
//! - Recording and printing run statistics

mod json_feed;
pub mod stats;
mod traits;

pub use json_feed::JsonFeedWriter;
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{OutputError, OutputHandler, OutputResult, ProductRecord};
