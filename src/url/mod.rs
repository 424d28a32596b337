//! URL handling module for Shelf-Crawl
//!
//! This module provides link resolution, canonical visited-set keys, host
//! extraction and the substring filters used by the frontier walker.

mod domain;
mod matcher;
mod normalize;

use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use domain::extract_domain;
pub use matcher::{find_skip_keyword, host_allowed};
pub use normalize::canonicalize;

/// Resolves a link href against the page it was found on
///
/// Relative hrefs are joined onto `base`. The result must be an HTTP(S) URL
/// with a host; anything else is reported as an error so callers can drop it.
///
/// # Errors
///
/// * `UrlError::Parse` - empty, fragment-only, or unparseable href
/// * `UrlError::InvalidScheme` - `javascript:`, `mailto:`, `tel:`, `data:` and
///   any other non-HTTP scheme
/// * `UrlError::MissingHost` - resolved URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use shelf_crawl::url::resolve_link;
///
/// let base = Url::parse("https://example.com/collections/").unwrap();
/// let url = resolve_link("sale", &base).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/collections/sale");
///
/// assert!(resolve_link("mailto:care@example.com", &base).is_err());
/// ```
pub fn resolve_link(href: &str, base: &Url) -> UrlResult<Url> {
    let href = href.trim();

    if href.is_empty() {
        return Err(UrlError::Parse("empty href".to_string()));
    }

    // Same-page anchors
    if href.starts_with('#') {
        return Err(UrlError::Parse(format!("fragment-only href '{}'", href)));
    }

    let url = base
        .join(href)
        .map_err(|e| UrlError::Parse(format!("'{}': {}", href, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if extract_domain(&url).is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}
