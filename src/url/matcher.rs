/// Checks if a host contains at least one of the allowed domain substrings
///
/// Matching is a plain substring test on the lowercase host, so an entry of
/// "westside.com" admits "westside.com", "www.westside.com" and
/// "shop.westside.com".
///
/// # Examples
///
/// ```
/// use shelf_crawl::url::host_allowed;
///
/// let allowed = vec!["westside.com".to_string()];
/// assert!(host_allowed("www.westside.com", &allowed));
/// assert!(!host_allowed("instagram.com", &allowed));
/// ```
pub fn host_allowed(host: &str, allowed_domains: &[String]) -> bool {
    allowed_domains
        .iter()
        .any(|domain| host.contains(domain.as_str()))
}

/// Returns the first skip keyword found in a URL path, if any
///
/// The path is lowercased before matching; keywords are expected lowercase.
pub fn find_skip_keyword<'a>(path: &str, keywords: &'a [String]) -> Option<&'a str> {
    let path = path.to_lowercase();
    keywords
        .iter()
        .find(|kw| path.contains(kw.as_str()))
        .map(|kw| kw.as_str())
}
