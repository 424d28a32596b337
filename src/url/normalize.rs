use url::Url;

/// List of tracking query parameters to remove during canonicalization
const TRACKING_PARAMS: &[&str] = &[
    "fbclid", "gclid", "mc_eid", "_pos", "_sid", "_ss", "_psq",
];

/// Canonicalizes an absolute URL for use as a visited-set key
///
/// # Canonicalization Steps
///
/// 1. Remove fragment (everything after #)
/// 2. Remove tracking query parameters (`utm_*` and the storefront's
///    search-position markers)
/// 3. Sort remaining query parameters by key
/// 4. Remove empty query string (trailing ?)
///
/// Scheme, host and path are left as parsed; the `url` crate already
/// lowercases hosts and resolves dot segments.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use shelf_crawl::url::canonicalize;
///
/// let url = Url::parse("https://www.westside.com/collections/sale?page=2&utm_source=ig#top").unwrap();
/// assert_eq!(canonicalize(&url).as_str(), "https://www.westside.com/collections/sale?page=2");
/// ```
pub fn canonicalize(url: &Url) -> Url {
    let mut url = url.clone();

    url.set_fragment(None);

    if url.query().is_some() {
        let params = filter_and_sort_query_params(&url);

        if params.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(params);
        }
    }

    url
}

/// Filters out tracking parameters and sorts remaining query parameters
fn filter_and_sort_query_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    // Stable sort keeps repeated keys in their original order
    params.sort_by(|a, b| a.0.cmp(&b.0));

    params
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}
