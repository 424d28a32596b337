//! Chromium-backed browser session
//!
//! Launches one headless Chromium through the DevTools protocol and keeps a
//! single tab open for the whole run.

use crate::browser::error::{BrowserError, Result};
use crate::browser::session::{AnchorElement, BrowserSession};
use crate::config::BrowserConfig;
use chromiumoxide::browser::{Browser, BrowserConfig as ChromiumConfig};
use chromiumoxide::element::Element;
use chromiumoxide::Page;
use futures_util::stream::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;

const SCROLL_HEIGHT_SCRIPT: &str = "document.body.scrollHeight";
const SCROLL_TO_BOTTOM_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// A live Chromium process with one open page
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    closed: bool,
}

impl ChromiumSession {
    /// Launches Chromium with the configured flags and opens a blank tab
    ///
    /// # Arguments
    ///
    /// * `config` - Browser flags, executable and timeouts
    /// * `user_agent` - Identification string the browser should send
    pub async fn launch(config: &BrowserConfig, user_agent: &str) -> Result<Self> {
        let mut builder = ChromiumConfig::builder()
            .request_timeout(Duration::from_secs(config.page_load_timeout_secs))
            .window_size(1366, 900)
            .arg(format!("--user-agent={}", user_agent));

        if !config.headless {
            builder = builder.with_head();
        }
        if config.no_sandbox {
            builder = builder.no_sandbox();
        }
        if config.disable_dev_shm {
            builder = builder.arg("--disable-dev-shm-usage");
        }
        if let Some(path) = &config.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        let chromium_config = builder.build().map_err(BrowserError::Launch)?;

        tracing::info!(
            "Launching browser (headless: {}, no-sandbox: {}, disable-dev-shm: {})",
            config.headless,
            config.no_sandbox,
            config.disable_dev_shm
        );
        let (mut browser, mut handler) = Browser::launch(chromium_config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::trace!("Browser handler event error: {}", e);
                }
            }
            tracing::debug!("Browser handler task completed");
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                // Don't leak the process when the first tab fails
                let _ = browser.close().await;
                let _ = browser.wait().await;
                handler.abort();
                return Err(BrowserError::Launch(e.to_string()));
            }
        };

        Ok(Self {
            browser,
            page,
            handler,
            closed: false,
        })
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(BrowserError::Closed)
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl BrowserSession for ChromiumSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.ensure_open()?;
        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::Navigation(format!("{}: {}", url, e)))?;
        Ok(())
    }

    async fn scroll_height(&mut self) -> Result<u64> {
        self.ensure_open()?;
        let height: f64 = self
            .page
            .evaluate(SCROLL_HEIGHT_SCRIPT)
            .await
            .map_err(|e| BrowserError::Script(e.to_string()))?
            .into_value()
            .map_err(|e| BrowserError::Script(format!("scrollHeight: {}", e)))?;
        Ok(height.max(0.0) as u64)
    }

    async fn scroll_to_bottom(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.page
            .evaluate(SCROLL_TO_BOTTOM_SCRIPT)
            .await
            .map_err(|e| BrowserError::Script(e.to_string()))?;
        Ok(())
    }

    async fn find_anchors(&mut self, selector: &str) -> Result<Vec<Box<dyn AnchorElement>>> {
        self.ensure_open()?;
        let elements = self
            .page
            .find_elements(selector)
            .await
            .map_err(|e| BrowserError::Element(format!("{}: {}", selector, e)))?;

        Ok(elements
            .into_iter()
            .map(|element| Box::new(ChromiumAnchor(element)) as Box<dyn AnchorElement>)
            .collect())
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        tracing::info!("Shutting down browser");
        let closed = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| BrowserError::Launch(format!("close: {}", e)));
        if let Err(e) = self.browser.wait().await {
            tracing::warn!("Failed waiting for browser process to exit: {}", e);
        }
        self.handler.abort();
        closed
    }
}

/// Anchor element backed by a DevTools remote object
struct ChromiumAnchor(Element);

#[async_trait::async_trait]
impl AnchorElement for ChromiumAnchor {
    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.0
            .attribute(name)
            .await
            .map_err(|e| BrowserError::Element(format!("attribute {}: {}", name, e)))
    }

    async fn inner_text(&self) -> Result<Option<String>> {
        self.0
            .inner_text()
            .await
            .map_err(|e| BrowserError::Element(format!("inner text: {}", e)))
    }
}
