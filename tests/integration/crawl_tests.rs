//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small storefront and an in-process
//! browser session that replays scripted product tiles, and run the full
//! crawl cycle end-to-end.

use shelf_crawl::browser::{AnchorElement, BrowserSession, Result as BrowserResult};
use shelf_crawl::config::{Config, CrawlerConfig, SiteConfig};
use shelf_crawl::crawler::{build_http_client, Coordinator};
use shelf_crawl::output::{JsonFeedWriter, OutputHandler, ProductRecord};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Clone)]
struct Tile {
    href: String,
    title: String,
}

#[async_trait::async_trait]
impl AnchorElement for Tile {
    async fn attribute(&self, name: &str) -> BrowserResult<Option<String>> {
        Ok(match name {
            "href" => Some(self.href.clone()),
            "title" => Some(self.title.clone()),
            _ => None,
        })
    }

    async fn inner_text(&self) -> BrowserResult<Option<String>> {
        Ok(Some(self.title.clone()))
    }
}

/// Serves product tiles per collection path; the page stops growing at once
struct FakeStorefrontBrowser {
    tiles: HashMap<String, Vec<Tile>>,
    current: Option<String>,
    visits: Arc<Mutex<Vec<String>>>,
    closes: Arc<Mutex<u32>>,
    closed: bool,
}

#[async_trait::async_trait]
impl BrowserSession for FakeStorefrontBrowser {
    async fn navigate(&mut self, url: &str) -> BrowserResult<()> {
        let path = url::Url::parse(url)
            .map(|u| u.path().to_string())
            .unwrap_or_default();
        self.visits.lock().unwrap().push(path.clone());
        self.current = Some(path);
        Ok(())
    }

    async fn scroll_height(&mut self) -> BrowserResult<u64> {
        Ok(1200)
    }

    async fn scroll_to_bottom(&mut self) -> BrowserResult<()> {
        Ok(())
    }

    async fn find_anchors(&mut self, _selector: &str) -> BrowserResult<Vec<Box<dyn AnchorElement>>> {
        let tiles = self
            .current
            .as_ref()
            .and_then(|path| self.tiles.get(path))
            .cloned()
            .unwrap_or_default();
        Ok(tiles
            .into_iter()
            .map(|tile| Box::new(tile) as Box<dyn AnchorElement>)
            .collect())
    }

    async fn close(&mut self) -> BrowserResult<()> {
        if !self.closed {
            self.closed = true;
            *self.closes.lock().unwrap() += 1;
        }
        Ok(())
    }
}

fn tile(href: &str, title: &str) -> Tile {
    Tile {
        href: href.to_string(),
        title: title.to_string(),
    }
}

fn html_page(title: &str, links: &[&str]) -> ResponseTemplate {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    ResponseTemplate::new(200).set_body_raw(
        format!(
            "<html><head><title>{}</title></head><body>{}</body></html>",
            title, anchors
        ),
        "text/html; charset=utf-8",
    )
}

fn create_test_config(server: &MockServer, output: &std::path::Path) -> Config {
    let mut config = Config {
        crawler: CrawlerConfig {
            max_concurrent_requests: 4,
            download_delay_ms: 5,
            ..CrawlerConfig::default()
        },
        site: SiteConfig {
            start_urls: vec![format!("{}/", server.uri())],
            allowed_domains: vec!["127.0.0.1".to_string()],
            ..SiteConfig::default()
        },
        ..Config::default()
    };
    config.browser.scroll_settle_ms = 0;
    config.output.path = output.display().to_string();
    config
}

#[tokio::test]
async fn test_full_storefront_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            "Home",
            &[
                "/collections/sale",
                "/about",
                "/account/login",
                "/cart",
                "https://instagram.com/storefront",
                "mailto:care@example.com",
            ],
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html_page(
            "About",
            &["/", "/collections/sale", "/collections/new-in", "/stores"],
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/stores"))
        .respond_with(html_page("Stores", &["/about#team"]))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/account/login"))
        .respond_with(html_page("Login", &[]))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cart"))
        .respond_with(html_page("Cart", &[]))
        .expect(0)
        .mount(&server)
        .await;

    let mut tiles = HashMap::new();
    tiles.insert(
        "/collections/sale".to_string(),
        vec![
            tile("/products/linen-shirt", "Linen Shirt"),
            tile("/pages/size-guide", "Size Guide"),
            tile("/products/cotton-kurta", "Cotton Kurta"),
        ],
    );
    tiles.insert(
        "/collections/new-in".to_string(),
        vec![tile("/products/linen-shirt", "Linen Shirt")],
    );

    let visits = Arc::new(Mutex::new(Vec::new()));
    let closes = Arc::new(Mutex::new(0));
    let browser = FakeStorefrontBrowser {
        tiles,
        current: None,
        visits: Arc::clone(&visits),
        closes: Arc::clone(&closes),
        closed: false,
    };

    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("out").join("products.json");
    let config = create_test_config(&server, &output_path);
    let client = build_http_client(&config.crawler).unwrap();

    let report = Coordinator::new(config, client, Box::new(browser))
        .run()
        .await
        .expect("crawl should succeed");

    // Each collection opened exactly once, browser torn down once
    let mut visited_collections = visits.lock().unwrap().clone();
    visited_collections.sort();
    assert_eq!(
        visited_collections,
        vec!["/collections/new-in", "/collections/sale"]
    );
    assert_eq!(*closes.lock().unwrap(), 1);

    // No cross-collection dedupe: the shirt appears under both
    assert_eq!(report.records.len(), 3);
    assert_eq!(report.stats.pages_fetched, 3);
    assert_eq!(report.stats.collections_processed, 2);
    assert_eq!(report.stats.products_found, 3);
    assert_eq!(report.stats.links_ignored.get("skip-keyword"), Some(&2));
    assert_eq!(report.stats.links_ignored.get("off-domain"), Some(&1));

    let mut writer = JsonFeedWriter::new(&output_path, true);
    writer.write_records(&report.records).unwrap();

    let written: Vec<ProductRecord> =
        serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(written, report.records);

    let sale = format!("{}/collections/sale", base);
    let from_sale: Vec<_> = written
        .iter()
        .filter(|r| r.collection_url == sale)
        .map(|r| (r.url.as_str(), r.title.as_str()))
        .collect();
    let shirt_url = format!("{}/products/linen-shirt", base);
    let kurta_url = format!("{}/products/cotton-kurta", base);
    assert_eq!(
        from_sale,
        vec![
            (shirt_url.as_str(), "Linen Shirt"),
            (kurta_url.as_str(), "Cotton Kurta")
        ]
    );
}

#[tokio::test]
async fn test_empty_crawl_writes_empty_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("Nothing here", &["/about-us-is-missing"]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let closes = Arc::new(Mutex::new(0));
    let browser = FakeStorefrontBrowser {
        tiles: HashMap::new(),
        current: None,
        visits: Arc::new(Mutex::new(Vec::new())),
        closes: Arc::clone(&closes),
        closed: false,
    };

    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("products.json");
    let config = create_test_config(&server, &output_path);
    let client = build_http_client(&config.crawler).unwrap();

    let report = Coordinator::new(config, client, Box::new(browser))
        .run()
        .await
        .unwrap();

    assert!(report.records.is_empty());
    assert_eq!(report.stats.pages_fetched, 1);
    assert_eq!(report.stats.pages_failed, 1);
    assert_eq!(*closes.lock().unwrap(), 1);

    let mut writer = JsonFeedWriter::new(&output_path, false);
    writer.write_records(&report.records).unwrap();
    assert_eq!(std::fs::read_to_string(&output_path).unwrap().trim(), "[]");
}

#[tokio::test]
async fn test_per_host_delay_spaces_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("Home", &["/a", "/b", "/c"]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(html_page("Leaf", &[]))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &temp_dir.path().join("p.json"));
    config.crawler.download_delay_ms = 100;
    let client = build_http_client(&config.crawler).unwrap();

    let browser = FakeStorefrontBrowser {
        tiles: HashMap::new(),
        current: None,
        visits: Arc::new(Mutex::new(Vec::new())),
        closes: Arc::new(Mutex::new(0)),
        closed: false,
    };

    let start = std::time::Instant::now();
    let report = Coordinator::new(config, client, Box::new(browser))
        .run()
        .await
        .unwrap();

    // Four requests to one host need at least three delay windows
    assert_eq!(report.stats.pages_fetched, 4);
    assert!(start.elapsed() >= std::time::Duration::from_millis(300));
}
