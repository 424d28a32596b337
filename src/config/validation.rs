use crate::config::types::{
    BrowserConfig, Config, CrawlerConfig, LoggingConfig, OutputConfig, SiteConfig,
};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_site_config(&config.site)?;
    validate_browser_config(&config.browser)?;
    validate_output_config(&config.output)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_requests < 1 || config.max_concurrent_requests > 100 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-requests must be between 1 and 100, got {}",
            config.max_concurrent_requests
        )));
    }

    if config.max_visited_pages < 1 {
        return Err(ConfigError::Validation(
            "max-visited-pages must be >= 1".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates start URLs, domain filters and path markers
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    if config.start_urls.is_empty() {
        return Err(ConfigError::Validation(
            "at least one start URL is required".to_string(),
        ));
    }

    for start in &config.start_urls {
        let url = Url::parse(start).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid start URL '{}': {}", start, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "Start URL '{}' must use http or https",
                start
            )));
        }

        if url.host_str().is_none() {
            return Err(ConfigError::InvalidUrl(format!(
                "Start URL '{}' has no host",
                start
            )));
        }
    }

    if config.allowed_domains.is_empty() {
        return Err(ConfigError::Validation(
            "at least one allowed domain is required".to_string(),
        ));
    }

    for domain in &config.allowed_domains {
        validate_domain_substring(domain)?;
    }

    for keyword in &config.skip_keywords {
        if keyword.trim().is_empty() {
            return Err(ConfigError::InvalidPattern(
                "skip keywords cannot be empty".to_string(),
            ));
        }
    }

    validate_marker("collection-marker", &config.collection_marker)?;
    validate_marker("product-marker", &config.product_marker)?;

    Ok(())
}

/// Validates browser configuration
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    if Selector::parse(&config.product_selector).is_err() {
        return Err(ConfigError::InvalidPattern(format!(
            "product-selector '{}' is not a valid CSS selector",
            config.product_selector
        )));
    }

    if config.max_scroll_attempts < 1 || config.max_scroll_attempts > 50 {
        return Err(ConfigError::Validation(format!(
            "max-scroll-attempts must be between 1 and 50, got {}",
            config.max_scroll_attempts
        )));
    }

    if let Some(path) = &config.chrome_executable {
        if path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "chrome-executable cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging_config(config: &LoggingConfig) -> Result<(), ConfigError> {
    if !LOG_LEVELS.contains(&config.level.to_lowercase().as_str()) {
        return Err(ConfigError::Validation(format!(
            "log level must be one of {}, got '{}'",
            LOG_LEVELS.join(", "),
            config.level
        )));
    }

    Ok(())
}

/// Validates an allowed-domain entry
///
/// Entries are matched as substrings of the host, so "westside.com" also
/// admits "www.westside.com".
fn validate_domain_substring(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Allowed domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Allowed domain '{}' contains invalid characters",
            domain
        )));
    }

    Ok(())
}

fn validate_marker(name: &str, marker: &str) -> Result<(), ConfigError> {
    if !marker.starts_with('/') || marker.len() < 2 {
        return Err(ConfigError::InvalidPattern(format!(
            "{} must be a path fragment starting with '/', got '{}'",
            name, marker
        )));
    }

    Ok(())
}
