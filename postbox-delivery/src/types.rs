//! Type definitions for the delivery strategy

use serde::{Deserialize, Serialize};

/// Position of a transport in the configured priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportRole {
    /// First entry in the order; the deployment's preferred transport
    Primary,
    /// Any later entry, tried only after earlier ones failed
    Fallback,
}

/// Result of one transport attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Delivered,
    Failed,
}

/// Record of a single attempt against one transport.
///
/// Transient: lives for the duration of one delivery run and for telemetry
/// reporting; never persisted.
#[derive(Debug, Clone)]
pub struct TransportAttempt {
    /// Name of the transport that was tried
    pub transport: &'static str,
    /// Where that transport sat in the priority order
    pub role: TransportRole,
    pub outcome: AttemptOutcome,
    /// Failure detail, absent on delivery
    pub error: Option<String>,
}

/// Everything the strategy can say about one successful delivery run.
#[derive(Debug, Clone)]
pub struct DeliveryReport {
    /// All attempts made, in order; the last one delivered
    pub attempts: Vec<TransportAttempt>,
}

impl DeliveryReport {
    /// Number of attempts made, including the delivering one.
    #[must_use]
    pub fn attempt_count(&self) -> usize {
        self.attempts.len()
    }
}

/// Delivery strategy tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Seconds allowed for a single transport attempt before it is treated
    /// as a network failure and the next transport is tried.
    ///
    /// Default: 10 seconds
    #[serde(default = "default_attempt_timeout")]
    pub attempt_timeout_secs: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            attempt_timeout_secs: default_attempt_timeout(),
        }
    }
}

const fn default_attempt_timeout() -> u64 {
    10
}
