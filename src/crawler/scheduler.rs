//! Scheduler for managing the crawl frontier and rate limiting
//!
//! This module handles:
//! - Priority queue of pending page and collection tasks
//! - Global concurrency limiting via a semaphore
//! - A fixed minimum delay between requests to the same host

use crate::config::CrawlerConfig;
use crate::state::HostState;
use crate::url::extract_domain;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use url::Url;

/// What a task does with its URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Fetch over HTTP and walk its links
    Page,
    /// Load in the browser and extract products
    Collection,
}

/// A unit of work in the frontier
#[derive(Debug, Clone)]
pub struct CrawlTask {
    pub kind: TaskKind,
    pub url: Url,
    /// Link distance from the nearest start URL
    pub depth: u32,
}

impl CrawlTask {
    pub fn page(url: Url, depth: u32) -> Self {
        Self {
            kind: TaskKind::Page,
            url,
            depth,
        }
    }

    pub fn collection(url: Url, depth: u32) -> Self {
        Self {
            kind: TaskKind::Collection,
            url,
            depth,
        }
    }

    /// Lower values are handed out first
    ///
    /// Collections go ahead of pages so product extraction is not starved by
    /// generic expansion; pages are breadth-first.
    fn priority(&self) -> u32 {
        match self.kind {
            TaskKind::Collection => 0,
            TaskKind::Page => self.depth + 1,
        }
    }
}

#[derive(Debug)]
struct QueuedTask {
    task: CrawlTask,
    host: String,
    priority: u32,
    /// Insertion order, FIFO among equal priorities
    seq: u64,
}

// Reversed so BinaryHeap pops the lowest priority, then the oldest
impl Ord for QueuedTask {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueuedTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueuedTask {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for QueuedTask {}

/// A task cleared for dispatch, holding one concurrency slot
#[derive(Debug)]
pub struct ScheduledTask {
    pub task: CrawlTask,
    pub permit: OwnedSemaphorePermit,
}

/// Answer from [`Scheduler::try_next`]
#[derive(Debug)]
pub enum NextTask {
    /// Dispatch this now
    Ready(ScheduledTask),
    /// Every pending host is inside its delay window; retry after this long
    Wait(Duration),
    /// All concurrency slots are in use
    Busy,
    /// Nothing is pending
    Empty,
}

/// Scheduler manages the frontier queue and rate limiting
///
/// The scheduler coordinates:
/// - Global concurrency limits (max requests in flight)
/// - Per-host rate limits (minimum time between requests)
/// - Priority-based task selection from the frontier
pub struct Scheduler {
    /// Global semaphore for limiting concurrent requests
    global_semaphore: Arc<Semaphore>,

    /// Per-host state tracking
    host_states: HashMap<String, HostState>,

    /// Frontier priority queue of pending tasks
    frontier: BinaryHeap<QueuedTask>,

    next_seq: u64,

    /// Crawler configuration
    config: CrawlerConfig,
}

impl Scheduler {
    /// Creates a new scheduler with an empty frontier
    pub fn new(config: CrawlerConfig) -> Self {
        let global_semaphore = Arc::new(Semaphore::new(config.max_concurrent_requests as usize));

        Self {
            global_semaphore,
            host_states: HashMap::new(),
            frontier: BinaryHeap::new(),
            next_seq: 0,
            config,
        }
    }

    /// Adds a task to the frontier
    pub fn push(&mut self, task: CrawlTask) {
        let host = extract_domain(&task.url).unwrap_or_default();
        let priority = task.priority();
        let seq = self.next_seq;
        self.next_seq += 1;

        self.frontier.push(QueuedTask {
            task,
            host,
            priority,
            seq,
        });
    }

    /// Hands out the best task whose host is ready, without blocking
    ///
    /// On success the host's request time is recorded and a concurrency
    /// permit travels with the task; dropping it frees the slot.
    pub fn try_next(&mut self) -> NextTask {
        self.try_next_at(Instant::now())
    }

    fn try_next_at(&mut self, now: Instant) -> NextTask {
        if self.frontier.is_empty() {
            return NextTask::Empty;
        }

        let permit = match Arc::clone(&self.global_semaphore).try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => return NextTask::Busy,
        };

        let mut not_ready = Vec::new();
        let mut found = None;

        // Pop in priority order until a ready host turns up
        while let Some(queued) = self.frontier.pop() {
            let state = self
                .host_states
                .entry(queued.host.clone())
                .or_insert_with(HostState::new);

            if state.can_request(&self.config, now) {
                state.record_request(now);
                found = Some(queued);
                break;
            }

            tracing::trace!("Host {} not ready for {}", queued.host, queued.task.url);
            not_ready.push(queued);
        }

        for queued in not_ready {
            self.frontier.push(queued);
        }

        match found {
            Some(queued) => NextTask::Ready(ScheduledTask {
                task: queued.task,
                permit,
            }),
            None => NextTask::Wait(self.minimum_wait_time(now)),
        }
    }

    /// Time until the soonest pending host leaves its delay window
    fn minimum_wait_time(&self, now: Instant) -> Duration {
        let mut min_wait: Option<Duration> = None;

        for queued in self.frontier.iter() {
            let wait = self
                .host_states
                .get(&queued.host)
                .and_then(|state| state.time_until_next_request(&self.config, now))
                .unwrap_or(Duration::ZERO);

            min_wait = Some(match min_wait {
                Some(current) => current.min(wait),
                None => wait,
            });
        }

        // Small buffer so the host is definitely ready on the retry
        min_wait.unwrap_or(Duration::ZERO) + Duration::from_millis(10)
    }

    /// Returns the number of tasks in the frontier
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    /// Returns whether the frontier is empty
    pub fn is_empty(&self) -> bool {
        self.frontier.is_empty()
    }

    /// Gets the state for a specific host
    pub fn host_state(&self, host: &str) -> Option<&HostState> {
        self.host_states.get(host)
    }
}
