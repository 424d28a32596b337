//! Frontier walker: link classification and run-wide deduplication
//!
//! Every outbound link on a fetched page is resolved against the page URL and
//! classified as a collection page (handed to the browser extractor), a
//! generic page (fetched and walked again), or ignored with a reason.

use crate::config::{CrawlerConfig, SiteConfig};
use crate::url::{canonicalize, extract_domain, find_skip_keyword, host_allowed, resolve_link};
use std::collections::HashSet;
use std::fmt;
use std::sync::Mutex;
use url::Url;

/// Result of a bounded page insert into the visited set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    Inserted,
    Present,
    Full,
}

#[derive(Debug, Default)]
struct Visited {
    urls: HashSet<String>,
    /// Seeds and generic pages admitted so far; collections are not counted
    pages: usize,
}

/// Run-scoped set of canonical URLs that have been dispatched
///
/// Only grows. All operations take `&self` so the set can be shared between
/// worker tasks.
#[derive(Debug, Default)]
pub struct VisitedSet {
    inner: Mutex<Visited>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the URL if absent without counting it as a page. Returns true if
    /// this call inserted it.
    pub fn insert(&self, url: &Url) -> bool {
        self.lock().urls.insert(url.as_str().to_string())
    }

    /// Adds a page URL while fewer than `ceiling` pages have been admitted
    ///
    /// The page count and the set are updated under one lock, so concurrent
    /// callers cannot push the count past the ceiling.
    pub fn insert_page(&self, url: &Url, ceiling: usize) -> Insertion {
        let mut visited = self.lock();
        if visited.urls.contains(url.as_str()) {
            Insertion::Present
        } else if visited.pages >= ceiling {
            Insertion::Full
        } else {
            visited.urls.insert(url.as_str().to_string());
            visited.pages += 1;
            Insertion::Inserted
        }
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.lock().urls.contains(url.as_str())
    }

    /// Number of pages admitted through [`VisitedSet::insert_page`]
    pub fn pages(&self) -> usize {
        self.lock().pages
    }

    pub fn len(&self) -> usize {
        self.lock().urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().urls.is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Visited> {
        // A panic while holding the lock cannot leave the set half-updated
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Why a link was not dispatched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Empty, fragment-only, non-HTTP or hostless target
    Unresolvable,
    /// Host contains none of the allowed domain substrings
    OffDomain,
    /// Path contains a skip keyword
    SkipKeyword(String),
    AlreadyVisited,
    /// Following it would exceed the depth ceiling
    DepthLimit,
    /// The visited-page ceiling has been reached
    VisitedCeiling,
}

impl IgnoreReason {
    /// Short stable name used as a statistics key
    pub fn label(&self) -> &'static str {
        match self {
            IgnoreReason::Unresolvable => "unresolvable",
            IgnoreReason::OffDomain => "off-domain",
            IgnoreReason::SkipKeyword(_) => "skip-keyword",
            IgnoreReason::AlreadyVisited => "already-visited",
            IgnoreReason::DepthLimit => "depth-limit",
            IgnoreReason::VisitedCeiling => "visited-ceiling",
        }
    }
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreReason::SkipKeyword(kw) => write!(f, "skip-keyword '{}'", kw),
            other => f.write_str(other.label()),
        }
    }
}

/// Classification of one outbound link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkClass {
    Ignored(IgnoreReason),
    Collection(Url),
    Generic(Url),
}

/// Links dispatched from one page
#[derive(Debug, Default)]
pub struct Dispatch {
    pub collections: Vec<Url>,
    pub generics: Vec<Url>,
    pub ignored: Vec<(String, IgnoreReason)>,
}

/// Classifies links and owns the run's visited set
#[derive(Debug)]
pub struct FrontierWalker {
    allowed_domains: Vec<String>,
    skip_keywords: Vec<String>,
    collection_marker: String,
    max_depth: u32,
    max_visited_pages: usize,
    visited: VisitedSet,
}

impl FrontierWalker {
    pub fn new(site: &SiteConfig, crawler: &CrawlerConfig) -> Self {
        Self {
            allowed_domains: site
                .allowed_domains
                .iter()
                .map(|d| d.to_lowercase())
                .collect(),
            skip_keywords: site.skip_keywords.iter().map(|k| k.to_lowercase()).collect(),
            collection_marker: site.collection_marker.clone(),
            max_depth: crawler.max_depth,
            max_visited_pages: crawler.max_visited_pages,
            visited: VisitedSet::new(),
        }
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    /// Records a start URL. Seeds count toward the page ceiling but are
    /// never refused by it. Returns true if it was not already visited.
    pub fn mark_seed(&self, url: &Url) -> bool {
        self.visited.insert_page(&canonicalize(url), usize::MAX) == Insertion::Inserted
    }

    /// Records a URL reached outside of classification, such as a redirect
    /// target. Returns true if it was not already visited.
    pub fn mark_visited(&self, url: &Url) -> bool {
        self.visited.insert(&canonicalize(url))
    }

    /// True if the URL's path marks it as a collection page
    pub fn is_collection(&self, url: &Url) -> bool {
        url.path().contains(&self.collection_marker)
    }

    /// Classifies one href found on a page at `depth`
    ///
    /// Dispatched URLs are inserted into the visited set as a side effect, so
    /// classifying the same link twice yields at most one dispatch. The
    /// dispatched URL is the resolved link as written; its canonical form is
    /// only the visited-set key.
    ///
    /// Collection links skip the domain, keyword, depth and ceiling checks;
    /// only the visited set gates them, and they do not use up the page
    /// ceiling.
    pub fn classify(&self, href: &str, base: &Url, depth: u32) -> LinkClass {
        let url = match resolve_link(href, base) {
            Ok(url) => url,
            Err(_) => return LinkClass::Ignored(IgnoreReason::Unresolvable),
        };
        let key = canonicalize(&url);

        if self.is_collection(&url) {
            return if self.visited.insert(&key) {
                LinkClass::Collection(url)
            } else {
                LinkClass::Ignored(IgnoreReason::AlreadyVisited)
            };
        }

        let host = match extract_domain(&url) {
            Some(host) => host,
            None => return LinkClass::Ignored(IgnoreReason::Unresolvable),
        };

        if !host_allowed(&host, &self.allowed_domains) {
            return LinkClass::Ignored(IgnoreReason::OffDomain);
        }

        if let Some(keyword) = find_skip_keyword(url.path(), &self.skip_keywords) {
            return LinkClass::Ignored(IgnoreReason::SkipKeyword(keyword.to_string()));
        }

        if self.visited.contains(&key) {
            return LinkClass::Ignored(IgnoreReason::AlreadyVisited);
        }

        if depth + 1 > self.max_depth {
            return LinkClass::Ignored(IgnoreReason::DepthLimit);
        }

        match self.visited.insert_page(&key, self.max_visited_pages) {
            Insertion::Inserted => LinkClass::Generic(url),
            Insertion::Present => LinkClass::Ignored(IgnoreReason::AlreadyVisited),
            Insertion::Full => LinkClass::Ignored(IgnoreReason::VisitedCeiling),
        }
    }

    /// Classifies every href found on a page
    pub fn walk<S: AsRef<str>>(&self, page_url: &Url, hrefs: &[S], depth: u32) -> Dispatch {
        let mut dispatch = Dispatch::default();

        for href in hrefs {
            let href = href.as_ref();
            match self.classify(href, page_url, depth) {
                LinkClass::Collection(url) => {
                    tracing::debug!("Found collection: {}", url);
                    dispatch.collections.push(url);
                }
                LinkClass::Generic(url) => {
                    tracing::debug!("Following link: {}", url);
                    dispatch.generics.push(url);
                }
                LinkClass::Ignored(reason) => {
                    tracing::trace!("Ignoring {} ({})", href, reason);
                    dispatch.ignored.push((href.to_string(), reason));
                }
            }
        }

        dispatch
    }
}
