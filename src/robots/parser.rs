//! Robots.txt parser implementation
//!
//! Thin wrapper over the robotstxt crate's matcher.

use robotstxt::DefaultMatcher;

/// Parsed robots.txt data
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    /// Raw robots.txt content (empty string means allow all)
    content: String,
    /// Whether to allow all (true = allow all, false = parse content)
    allow_all: bool,
}

impl ParsedRobots {
    /// Creates a new ParsedRobots from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
            allow_all: false,
        }
    }

    /// Creates a permissive ParsedRobots that allows everything
    ///
    /// This is used when robots.txt is missing or cannot be fetched.
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
            allow_all: true,
        }
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL to check
    /// * `user_agent` - The user agent string; its product token is matched
    ///   against `User-agent` groups
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.allow_all || self.content.is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, product_token(user_agent), url)
    }
}

/// Extracts the product token robots.txt groups are matched against
///
/// "Mozilla/5.0 (Windows NT 10.0)" yields "Mozilla".
pub fn product_token(user_agent: &str) -> &str {
    let end = user_agent
        .find(|c: char| !(c.is_ascii_alphabetic() || c == '-' || c == '_'))
        .unwrap_or(user_agent.len());
    &user_agent[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    const UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

    #[test]
    fn test_allow_all() {
        let robots = ParsedRobots::allow_all();
        assert!(robots.is_allowed("https://example.com/any/path", UA));
        assert!(robots.is_allowed("https://example.com/admin", UA));
    }

    #[test]
    fn test_parse_disallow_all() {
        let robots = ParsedRobots::from_content("User-agent: *\nDisallow: /");
        assert!(!robots.is_allowed("https://example.com/", UA));
        assert!(!robots.is_allowed("https://example.com/collections/sale", UA));
    }

    #[test]
    fn test_parse_disallow_specific() {
        let robots = ParsedRobots::from_content("User-agent: *\nDisallow: /cart");
        assert!(robots.is_allowed("https://example.com/", UA));
        assert!(robots.is_allowed("https://example.com/collections/sale", UA));
        assert!(!robots.is_allowed("https://example.com/cart", UA));
        assert!(!robots.is_allowed("https://example.com/cart/add", UA));
    }

    #[test]
    fn test_parse_allow_and_disallow() {
        let robots = ParsedRobots::from_content(
            "User-agent: *\nDisallow: /collections\nAllow: /collections/sale",
        );
        assert!(!robots.is_allowed("https://example.com/collections/new", UA));
        assert!(robots.is_allowed("https://example.com/collections/sale", UA));
    }

    #[test]
    fn test_specific_agent_group() {
        let robots =
            ParsedRobots::from_content("User-agent: Mozilla\nDisallow: /\n\nUser-agent: *\nAllow: /");
        assert!(!robots.is_allowed("https://example.com/page", UA));
        assert!(robots.is_allowed("https://example.com/page", "GoodBot/1.0"));
    }

    #[test]
    fn test_product_token() {
        assert_eq!(product_token(UA), "Mozilla");
        assert_eq!(product_token("shelf-crawl/1.0"), "shelf-crawl");
        assert_eq!(product_token("Googlebot"), "Googlebot");
        assert_eq!(product_token(""), "");
    }

    #[test]
    fn test_garbage_robots_txt_allows() {
        let robots = ParsedRobots::from_content("This is not valid robots.txt {{{");
        assert!(robots.is_allowed("https://example.com/any/path", UA));
    }

    #[test]
    fn test_empty_robots_txt() {
        let robots = ParsedRobots::from_content("");
        assert!(robots.is_allowed("https://example.com/any/path", UA));
    }
}
