//! Shelf-Crawl main entry point
//!
//! This is the command-line interface for the Shelf-Crawl product-link crawler.

use anyhow::{Context, Result};
use clap::Parser;
use shelf_crawl::config::{load_config_with_hash, validate, Config};
use shelf_crawl::crawler::run_crawl;
use shelf_crawl::output::print_statistics;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Shelf-Crawl: a storefront product-link crawler
///
/// Shelf-Crawl walks a single storefront, opens collection pages in a
/// headless browser, scrolls until lazily-loaded product tiles stop
/// appearing, and writes every product link it finds to a JSON file.
#[derive(Parser, Debug)]
#[command(name = "shelf-crawl")]
#[command(version = "1.0.0")]
#[command(about = "A storefront product-link crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Start URL, replaces the configured list (repeatable)
    #[arg(long = "start-url", value_name = "URL")]
    start_urls: Vec<String>,

    /// Restrict generic link following to this domain
    #[arg(long, value_name = "DOMAIN")]
    domain: Option<String>,

    /// Output JSON file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without launching the browser
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            setup_logging(cli.verbose, cli.quiet, &config.logging.level);
            tracing::info!(
                "Configuration loaded from {} (hash: {})",
                path.display(),
                hash
            );
            config
        }
        None => {
            let config = Config::default();
            setup_logging(cli.verbose, cli.quiet, &config.logging.level);
            tracing::info!("No configuration file given, using defaults");
            config
        }
    };

    let config = apply_overrides(config, &cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber
///
/// `-q` and `-v` take precedence over the configured level.
fn setup_logging(verbose: u8, quiet: bool, configured_level: &str) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new(format!(
                "shelf_crawl={},warn",
                configured_level.to_lowercase()
            )),
            1 => EnvFilter::new("shelf_crawl=debug,info"),
            2 => EnvFilter::new("shelf_crawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies command-line overrides and re-validates the result
fn apply_overrides(mut config: Config, cli: &Cli) -> Result<Config> {
    if !cli.start_urls.is_empty() {
        config.site.start_urls = cli.start_urls.clone();
    }
    if let Some(domain) = &cli.domain {
        config.site.allowed_domains = vec![domain.to_lowercase()];
    }
    if let Some(output) = &cli.output {
        config.output.path = output.display().to_string();
    }

    validate(&config).context("Invalid configuration after command-line overrides")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Shelf-Crawl Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Max concurrent requests: {}",
        config.crawler.max_concurrent_requests
    );
    println!("  Download delay: {}ms", config.crawler.download_delay_ms);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Max visited pages: {}", config.crawler.max_visited_pages);
    println!("  Obey robots.txt: {}", config.crawler.obey_robots);
    println!("  User agent: {}", config.crawler.user_agent);

    println!("\nStart URLs ({}):", config.site.start_urls.len());
    for url in &config.site.start_urls {
        println!("  - {}", url);
    }
    println!("Allowed domains: {}", config.site.allowed_domains.join(", "));
    println!("Skip keywords: {}", config.site.skip_keywords.join(", "));
    println!(
        "Collection marker: {}  Product marker: {}",
        config.site.collection_marker, config.site.product_marker
    );

    println!("\nBrowser:");
    println!("  Headless: {}", config.browser.headless);
    println!("  Product selector: {}", config.browser.product_selector);
    println!(
        "  Scrolling: up to {} attempts, {}ms settle",
        config.browser.max_scroll_attempts, config.browser.scroll_settle_ms
    );
    if let Some(exe) = &config.browser.chrome_executable {
        println!("  Executable: {}", exe);
    }

    println!("\nOutput: {}", config.output.path);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> Result<()> {
    tracing::info!(
        "Crawling {} start URL(s), allowed domains: {}",
        config.site.start_urls.len(),
        config.site.allowed_domains.join(", ")
    );
    let output_path = config.output.path.clone();

    let report = match run_crawl(config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e).context("Crawl failed");
        }
    };

    print_statistics(&report.stats);
    println!(
        "✓ {} product records written to {}",
        report.records.len(),
        output_path
    );

    Ok(())
}
