//! Robots.txt handling module
//!
//! Only consulted when `obey-robots` is enabled; the default run ignores
//! robots.txt entirely.

mod cache;
mod parser;

pub use cache::{CachedRobots, RobotsCache};
pub use parser::ParsedRobots;

use reqwest::Client;
use url::Url;

/// Returns the origin key (`scheme://host[:port]`) used to cache robots.txt
pub fn origin_of(url: &Url) -> String {
    url.origin().ascii_serialization()
}

/// Fetches robots.txt for the origin of `url`
///
/// A missing file, a non-success status, or a network failure all yield an
/// allow-all policy; robots.txt problems never abort the crawl.
pub async fn fetch_robots(client: &Client, url: &Url) -> ParsedRobots {
    let robots_url = match url.join("/robots.txt") {
        Ok(u) => u,
        Err(_) => return ParsedRobots::allow_all(),
    };

    match client.get(robots_url.as_str()).send().await {
        Ok(response) if response.status().is_success() => match response.text().await {
            Ok(body) => ParsedRobots::from_content(&body),
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", robots_url, e);
                ParsedRobots::allow_all()
            }
        },
        Ok(response) => {
            tracing::debug!(
                "No robots.txt at {} (HTTP {}), allowing all",
                robots_url,
                response.status()
            );
            ParsedRobots::allow_all()
        }
        Err(e) => {
            tracing::warn!("Failed to fetch {}: {}", robots_url, e);
            ParsedRobots::allow_all()
        }
    }
}
