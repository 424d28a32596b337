use serde::Deserialize;

/// Browser-like identification string sent with every fetch
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Main configuration structure for Shelf-Crawl
///
/// Every section is optional; a missing section or key falls back to the
/// defaults for the Westside storefront.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub site: SiteConfig,
    pub browser: BrowserConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum number of tasks in flight at once
    pub max_concurrent_requests: u32,

    /// Minimum time between requests to the same host (milliseconds)
    pub download_delay_ms: u64,

    /// Maximum link depth from the start URLs for generic pages
    pub max_depth: u32,

    /// Generic expansion stops once this many URLs have been dispatched
    pub max_visited_pages: usize,

    /// Whether robots.txt directives are honored
    pub obey_robots: bool,

    /// User agent sent with HTTP fetches and by the browser
    pub user_agent: String,

    /// Per-request timeout for HTTP fetches (seconds)
    pub request_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 4,
            download_delay_ms: 2000,
            max_depth: 3,
            max_visited_pages: 50,
            obey_robots: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// What to crawl and how to recognize storefront pages
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SiteConfig {
    /// URLs the crawl starts from
    pub start_urls: Vec<String>,

    /// Host substrings a generic link must contain to be followed
    pub allowed_domains: Vec<String>,

    /// Path substrings (case-insensitive) that exclude a link from generic follow
    pub skip_keywords: Vec<String>,

    /// Path fragment marking a collection page
    pub collection_marker: String,

    /// Link fragment marking a product page
    pub product_marker: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            start_urls: vec!["https://www.westside.com/".to_string()],
            allowed_domains: vec!["westside.com".to_string()],
            skip_keywords: ["account", "login", "signin", "cart", "checkout", "wishlist"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            collection_marker: "/collections/".to_string(),
            product_marker: "/products/".to_string(),
        }
    }
}

/// Headless browser configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BrowserConfig {
    /// Run without a visible window
    pub headless: bool,

    /// Pass --no-sandbox to Chromium
    pub no_sandbox: bool,

    /// Pass --disable-dev-shm-usage to Chromium
    pub disable_dev_shm: bool,

    /// Explicit Chrome/Chromium binary; auto-detected when absent
    pub chrome_executable: Option<String>,

    /// CSS selector for product tile anchors
    pub product_selector: String,

    /// Upper bound on scroll-to-bottom iterations per collection page
    pub max_scroll_attempts: u32,

    /// Time to let new tiles render after each scroll (milliseconds)
    pub scroll_settle_ms: u64,

    /// Navigation timeout (seconds)
    pub page_load_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            no_sandbox: true,
            disable_dev_shm: true,
            chrome_executable: None,
            product_selector: "a.wizzy-result-product-item".to_string(),
            max_scroll_attempts: 5,
            scroll_settle_ms: 2000,
            page_load_timeout_secs: 30,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path of the JSON feed written at the end of the run
    pub path: String,

    /// Indent the JSON feed
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "westside_products.json".to_string(),
            pretty: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoggingConfig {
    /// One of error, warn, info, debug, trace
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
