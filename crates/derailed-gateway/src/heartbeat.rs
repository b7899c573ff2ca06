//! Heartbeat monitor
//!
//! Each connection gets a randomized interval, announced in Hello. Once
//! armed, the monitor fires `interval + grace` later unless re-armed.

use std::future::pending;
use std::pin::Pin;
use std::time::Duration;

use derailed_common::HeartbeatConfig;
use rand::Rng;
use tokio::time::{sleep, Instant, Sleep};

/// Pick an interval uniformly from the configured window
pub fn random_interval(config: &HeartbeatConfig) -> Duration {
    let ms = rand::thread_rng().gen_range(config.min_interval_ms..=config.max_interval_ms);
    Duration::from_millis(ms)
}

/// Per-connection liveness deadline
///
/// Holds a single timer, so re-arming always replaces the pending deadline.
#[derive(Debug)]
pub struct HeartbeatMonitor {
    interval: Duration,
    grace: Duration,
    deadline: Pin<Box<Sleep>>,
    armed: bool,
}

impl HeartbeatMonitor {
    /// Create an unarmed monitor with a fresh random interval
    pub fn new(config: &HeartbeatConfig) -> Self {
        Self::with_interval(
            random_interval(config),
            Duration::from_millis(config.grace_ms),
        )
    }

    pub fn with_interval(interval: Duration, grace: Duration) -> Self {
        Self {
            interval,
            grace,
            deadline: Box::pin(sleep(interval + grace)),
            armed: false,
        }
    }

    /// The interval announced to the client
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval.as_millis() as u64
    }

    /// Schedule the deadline `interval + grace` from now
    pub fn arm(&mut self) {
        let at = Instant::now() + self.interval + self.grace;
        self.deadline.as_mut().reset(at);
        self.armed = true;
    }

    pub fn cancel(&mut self) {
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Resolves when the armed deadline passes; never resolves while unarmed
    pub async fn expired(&mut self) {
        if !self.armed {
            pending::<()>().await;
        }
        self.deadline.as_mut().await;
        self.armed = false;
    }
}
