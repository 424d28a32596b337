use crate::browser::error::Result;

/// A scriptable browser tab the collection extractor drives
///
/// Implementations hold one live page. Calls are sequential; the extractor
/// serializes access behind a lock.
#[async_trait::async_trait]
pub trait BrowserSession: Send {
    /// Load a URL in the session's page
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// Current height of the document body in pixels
    async fn scroll_height(&mut self) -> Result<u64>;

    /// Scroll the window to the bottom of the document
    async fn scroll_to_bottom(&mut self) -> Result<()>;

    /// All elements matching a CSS selector, in document order
    async fn find_anchors(&mut self, selector: &str) -> Result<Vec<Box<dyn AnchorElement>>>;

    /// Tear down the browser. Calling this more than once is a no-op.
    async fn close(&mut self) -> Result<()>;
}

/// A handle to one anchor element on the page
#[async_trait::async_trait]
pub trait AnchorElement: Send + Sync {
    /// Raw attribute value, None when absent
    async fn attribute(&self, name: &str) -> Result<Option<String>>;

    /// Rendered text of the element
    async fn inner_text(&self) -> Result<Option<String>>;
}
