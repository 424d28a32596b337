//! Headless browser layer
//!
//! Collection pages render their product grid with JavaScript and load more
//! tiles as the page is scrolled, so they go through a real browser instead
//! of the HTTP fetcher. This module handles:
//! - The session abstraction the extractor drives
//! - A Chromium implementation over the DevTools protocol
//! - Scroll-to-reveal and product tile extraction

mod chromium;
mod error;
mod extractor;
mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use chromium::ChromiumSession;
pub use error::{BrowserError, Result};
pub use extractor::{
    collect_products, scroll_to_reveal, CollectionExtractor, Extraction, ExtractorSettings,
    ScrollOutcome,
};
pub use session::{AnchorElement, BrowserSession};
