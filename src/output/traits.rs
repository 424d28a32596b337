//! Output handler traits and types
//!
//! This module defines the product record emitted by the collection
//! extractor and the trait interface for sinks that persist a run's records.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// One product anchor found on a collection page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Absolute product URL
    pub url: String,

    /// The collection page the product was found on
    pub collection_url: String,

    /// Title attribute of the tile, or its visible text
    pub title: String,
}

/// Trait for the destination of a run's product records
///
/// Handlers receive the complete record list once, when the crawl ends.
pub trait OutputHandler {
    /// Writes all records, replacing any previous output
    fn write_records(&mut self, records: &[ProductRecord]) -> OutputResult<()>;
}
