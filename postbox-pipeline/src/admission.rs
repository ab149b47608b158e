//! Sliding-window admission control.
//!
//! Gates protected operations per client network identity before the
//! pipeline runs at all: a denied submission performs no store write and no
//! transport attempt. Each `(client, operation)` pair has its own window of
//! recent hits.
//!
//! # Example
//!
//! ```text
//! Limit: 5 per hour
//! - Submissions 1-5 inside the hour are admitted
//! - Submission 6 is denied with the wait until the oldest hit expires
//! - Once that hit leaves the rolling window, the client is admitted again
//! ```

use std::{
    collections::VecDeque,
    sync::Arc,
    time::{Duration, Instant},
};

use dashmap::DashMap;
use postbox_common::{ClientId, tracing};
use serde::{Deserialize, Serialize};

/// Operations with independent admission windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Contact message submission
    Submission,
    /// Secondary feedback-logging operation
    Feedback,
}

/// Configuration for admission control
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionConfig {
    /// Length of the rolling window in seconds
    ///
    /// Default: 3600 (one hour)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Submissions admitted per client per window
    ///
    /// Default: 5
    #[serde(default = "default_submission_limit")]
    pub submission_limit: u32,

    /// Feedback entries admitted per client per window
    ///
    /// Default: 3
    #[serde(default = "default_feedback_limit")]
    pub feedback_limit: u32,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            submission_limit: default_submission_limit(),
            feedback_limit: default_feedback_limit(),
        }
    }
}

const fn default_window_secs() -> u64 {
    3600
}

const fn default_submission_limit() -> u32 {
    5
}

const fn default_feedback_limit() -> u32 {
    3
}

impl AdmissionConfig {
    const fn limit_for(&self, operation: Operation) -> u32 {
        match operation {
            Operation::Submission => self.submission_limit,
            Operation::Feedback => self.feedback_limit,
        }
    }
}

/// Recent hits for one `(client, operation)` pair
#[derive(Debug, Default)]
struct Window {
    hits: VecDeque<Instant>,
}

impl Window {
    /// Drop hits that left the rolling window, then admit or compute the
    /// wait until the oldest remaining hit expires.
    fn try_admit(&mut self, window: Duration, limit: u32, now: Instant) -> Result<(), Duration> {
        if let Some(cutoff) = now.checked_sub(window) {
            while self.hits.front().is_some_and(|hit| *hit <= cutoff) {
                self.hits.pop_front();
            }
        }

        if limit == 0 {
            return Err(window);
        }

        if self.hits.len() < limit as usize {
            self.hits.push_back(now);
            Ok(())
        } else {
            let wait = self
                .hits
                .front()
                .map_or(window, |oldest| (*oldest + window).duration_since(now));
            Err(wait)
        }
    }
}

/// Per-client sliding-window limiter.
#[derive(Debug)]
pub struct AdmissionControl {
    config: AdmissionConfig,
    windows: DashMap<(ClientId, Operation), Arc<parking_lot::Mutex<Window>>>,
}

impl AdmissionControl {
    /// Create a new limiter with the given configuration
    #[must_use]
    pub fn new(config: AdmissionConfig) -> Self {
        Self {
            config,
            windows: DashMap::new(),
        }
    }

    /// Check whether the client may perform the operation now.
    ///
    /// Admitting counts against the window immediately.
    ///
    /// # Errors
    /// Returns the wait until the oldest hit leaves the window if the client
    /// is over its limit.
    pub fn check(&self, client: &ClientId, operation: Operation) -> Result<(), Duration> {
        self.check_at(client, operation, Instant::now())
    }

    fn check_at(
        &self,
        client: &ClientId,
        operation: Operation,
        now: Instant,
    ) -> Result<(), Duration> {
        let window = self
            .windows
            .entry((client.clone(), operation))
            .or_default()
            .clone();
        let mut window = window.lock();

        let result = window.try_admit(
            Duration::from_secs(self.config.window_secs),
            self.config.limit_for(operation),
            now,
        );
        drop(window);

        if let Err(wait) = result {
            tracing::debug!(
                client = %client,
                operation = ?operation,
                wait_seconds = wait.as_secs_f64(),
                "admission limit exceeded"
            );
        }
        result
    }
}
