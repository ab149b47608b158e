//! Scripted transport for tests and local development.
//!
//! Plays back a queue of results and records every notification it was
//! asked to send. An empty script means every send succeeds, which also
//! makes this a usable drop-the-mail transport when poking at the pipeline
//! locally.

use std::{collections::VecDeque, sync::Arc, time::Duration};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::{TransportError, notification::Notification, transport::Transport};

/// Transport double with scripted results and recorded calls.
#[derive(Debug, Clone)]
pub struct StubTransport {
    name: &'static str,
    script: Arc<Mutex<VecDeque<Result<(), TransportError>>>>,
    sent: Arc<Mutex<Vec<Notification>>>,
    delay: Option<Duration>,
    notify: Arc<Notify>,
}

impl StubTransport {
    /// Create a stub that succeeds on every send.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            script: Arc::new(Mutex::new(VecDeque::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            delay: None,
            notify: Arc::new(Notify::new()),
        }
    }

    /// Delay every send by `delay` before answering, to exercise timeouts.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a failure for the next unscripted send.
    pub fn push_failure(&self, error: TransportError) {
        self.script.lock().push_back(Err(error));
    }

    /// Queue an explicit success.
    pub fn push_success(&self) {
        self.script.lock().push_back(Ok(()));
    }

    /// Every notification this stub was asked to send, in order.
    #[must_use]
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().clone()
    }

    /// Number of send attempts made against this stub.
    #[must_use]
    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }

    /// Wait until at least `expected` sends were attempted, with timeout.
    ///
    /// Useful to observe deliveries running on detached tasks.
    ///
    /// # Errors
    /// Returns the elapsed error if the timeout is reached first
    pub async fn wait_for_count(
        &self,
        expected: usize,
        timeout: Duration,
    ) -> Result<(), tokio::time::error::Elapsed> {
        tokio::time::timeout(timeout, async {
            loop {
                if self.sent_count() >= expected {
                    return;
                }
                self.notify.notified().await;
            }
        })
        .await
    }
}

#[async_trait]
impl Transport for StubTransport {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn send(&self, notification: &Notification) -> crate::Result<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let result = self.script.lock().pop_front().unwrap_or(Ok(()));
        self.sent.lock().push(notification.clone());
        self.notify.notify_waiters();
        result
    }
}
