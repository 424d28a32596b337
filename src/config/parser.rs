use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so a run's output can be matched to the settings that
/// produced it.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
max-concurrent-requests = 2
download-delay-ms = 500
max-depth = 1
max-visited-pages = 10

[site]
start-urls = ["https://shop.example.com/"]
allowed-domains = ["example.com"]

[browser]
product-selector = "a.tile"
max-scroll-attempts = 3

[output]
path = "./products.json"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_concurrent_requests, 2);
        assert_eq!(config.crawler.download_delay_ms, 500);
        assert_eq!(config.crawler.max_visited_pages, 10);
        assert_eq!(config.site.start_urls, vec!["https://shop.example.com/"]);
        assert_eq!(config.browser.product_selector, "a.tile");
        assert_eq!(config.browser.max_scroll_attempts, 3);
        assert_eq!(config.output.path, "./products.json");
        // Unset keys keep their defaults
        assert_eq!(config.site.collection_marker, "/collections/");
        assert_eq!(config.browser.scroll_settle_ms, 2000);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();

        assert_eq!(config.crawler.max_concurrent_requests, 4);
        assert_eq!(config.crawler.download_delay_ms, 2000);
        assert_eq!(config.crawler.max_depth, 3);
        assert_eq!(config.crawler.max_visited_pages, 50);
        assert!(!config.crawler.obey_robots);
        assert!(config.crawler.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(config.site.start_urls, vec!["https://www.westside.com/"]);
        assert_eq!(config.site.allowed_domains, vec!["westside.com"]);
        assert_eq!(config.site.skip_keywords.len(), 6);
        assert_eq!(config.browser.max_scroll_attempts, 5);
        assert_eq!(config.output.path, "westside_products.json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/crawl.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[crawler]
max-concurrent-requests = 0
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("[output]\npath = \"a.json\"");
        let file2 = create_temp_config("[output]\npath = \"b.json\"");

        let (_, hash1) = load_config_with_hash(file1.path()).unwrap();
        let (_, hash2) = load_config_with_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
