use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// Returns None for URLs without a host (e.g. `data:` or `mailto:` URLs).
///
/// # Examples
///
/// ```
/// use url::Url;
/// use shelf_crawl::url::extract_domain;
///
/// let url = Url::parse("https://WWW.Westside.com/collections/sale").unwrap();
/// assert_eq!(extract_domain(&url), Some("www.westside.com".to_string()));
///
/// let url = Url::parse("mailto:care@westside.com").unwrap();
/// assert_eq!(extract_domain(&url), None);
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_lowercase())
}
