use crate::config::CrawlerConfig;
use std::time::{Duration, Instant};

/// Tracks the politeness state of one host during crawling
///
/// The delay is fixed; there is no backoff on errors or 429s.
#[derive(Debug, Clone, Default)]
pub struct HostState {
    /// Number of requests dispatched to this host in the current run
    pub request_count: u32,

    /// When the last request to this host was dispatched
    pub last_request_time: Option<Instant>,
}

impl HostState {
    /// Creates a new HostState with no requests recorded
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if a request can be dispatched to this host now
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration containing the download delay
    /// * `now` - The current time instant
    pub fn can_request(&self, config: &CrawlerConfig, now: Instant) -> bool {
        self.time_until_next_request(config, now).is_none()
    }

    /// Records that a request was dispatched to this host
    pub fn record_request(&mut self, now: Instant) {
        self.request_count += 1;
        self.last_request_time = Some(now);
    }

    /// Calculates the time until the next request can be made
    ///
    /// Returns None if a request can be made now, or the duration to wait otherwise.
    pub fn time_until_next_request(
        &self,
        config: &CrawlerConfig,
        now: Instant,
    ) -> Option<Duration> {
        let last = self.last_request_time?;
        let min_delay = Duration::from_millis(config.download_delay_ms);
        let elapsed = now.saturating_duration_since(last);
        if elapsed < min_delay {
            Some(min_delay - elapsed)
        } else {
            None
        }
    }
}
