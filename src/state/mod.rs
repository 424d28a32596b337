//! State module for tracking crawl progress
//!
//! Per-host politeness state used by the scheduler. Nothing here outlives a
//! single run.

mod host_state;

pub use host_state::HostState;
