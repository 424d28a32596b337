//! HTML parser for fetched storefront pages
//!
//! Pulls out the raw link targets and the page title. Links are left
//! unresolved; the frontier walker resolves and classifies them.

use scraper::{Html, Selector};

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// Raw href values of every `<a href>` on the page, in document order
    pub hrefs: Vec<String>,
}

/// Parses HTML content and extracts link targets and the title
///
/// Every `href` is returned as written in the document, `download` anchors
/// included; filtering of `javascript:`, `mailto:` and similar targets
/// happens at resolution.
///
/// # Example
///
/// ```
/// use shelf_crawl::crawler::parse_html;
///
/// let html = r#"<html><head><title>Sale</title></head><body><a href="/collections/sale">Sale</a></body></html>"#;
/// let parsed = parse_html(html);
/// assert_eq!(parsed.title, Some("Sale".to_string()));
/// assert_eq!(parsed.hrefs, vec!["/collections/sale".to_string()]);
/// ```
pub fn parse_html(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        hrefs: extract_hrefs(&document),
    }
}

fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn extract_hrefs(document: &Html) -> Vec<String> {
    let a_selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.to_string())
        .collect()
}
