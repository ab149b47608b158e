use std::{sync::Arc, time::Duration};

use postbox_common::Reporter;
use postbox_notify::{Notification, Transport, TransportError};

use crate::{
    error::DeliveryError,
    types::{AttemptOutcome, DeliveryConfig, DeliveryReport, TransportAttempt, TransportRole},
};

/// Ordered transport fallback.
///
/// The strategy owns the priority order; transports know nothing about each
/// other. One `deliver` call makes at most one attempt per transport.
#[derive(Debug)]
pub struct DeliveryStrategy {
    transports: Vec<Arc<dyn Transport>>,
    config: DeliveryConfig,
    reporter: Arc<dyn Reporter>,
}

impl DeliveryStrategy {
    #[must_use]
    pub fn new(
        transports: Vec<Arc<dyn Transport>>,
        config: DeliveryConfig,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            transports,
            config,
            reporter,
        }
    }

    /// Number of transports in the priority order.
    #[must_use]
    pub fn transport_count(&self) -> usize {
        self.transports.len()
    }

    /// Transport names in priority order, for logs and wiring checks.
    #[must_use]
    pub fn transport_names(&self) -> Vec<&'static str> {
        self.transports.iter().map(|t| t.name()).collect()
    }

    /// Try each transport in priority order until one delivers.
    ///
    /// Config-level failures (missing credentials) skip straight to the next
    /// transport; so do connection-level failures and attempts that outlive
    /// the per-attempt timeout. Exactly one pass is made over the list, and
    /// every failed attempt is reported to telemetry without altering
    /// control flow.
    ///
    /// # Errors
    /// `DeliveryError::AllTransportsFailed` when the order is exhausted; the
    /// error carries every attempt record. An empty order is exhaustion with
    /// zero attempts.
    pub async fn deliver(
        &self,
        notification: &Notification,
    ) -> Result<DeliveryReport, DeliveryError> {
        let timeout = Duration::from_secs(self.config.attempt_timeout_secs);
        let mut attempts = Vec::with_capacity(self.transports.len());

        for (index, transport) in self.transports.iter().enumerate() {
            let role = if index == 0 {
                TransportRole::Primary
            } else {
                TransportRole::Fallback
            };

            let result = match tokio::time::timeout(timeout, transport.send(notification)).await {
                Ok(result) => result,
                Err(_) => Err(TransportError::NetworkError(format!(
                    "attempt timed out after {}s",
                    self.config.attempt_timeout_secs
                ))),
            };

            match result {
                Ok(()) => {
                    attempts.push(TransportAttempt {
                        transport: transport.name(),
                        role,
                        outcome: AttemptOutcome::Delivered,
                        error: None,
                    });
                    tracing::info!(
                        transport = transport.name(),
                        attempt = attempts.len(),
                        "notification delivered"
                    );
                    return Ok(DeliveryReport { attempts });
                }
                Err(error) => {
                    if error.is_config_error() {
                        tracing::debug!(
                            transport = transport.name(),
                            "transport not configured, trying next"
                        );
                    } else {
                        tracing::warn!(
                            transport = transport.name(),
                            error = %error,
                            "transport attempt failed"
                        );
                    }
                    self.reporter.report(
                        &error.to_string(),
                        &format!("delivery attempt via {}", transport.name()),
                    );
                    attempts.push(TransportAttempt {
                        transport: transport.name(),
                        role,
                        outcome: AttemptOutcome::Failed,
                        error: Some(error.to_string()),
                    });
                }
            }
        }

        self.reporter
            .report("all transports failed", "notification delivery");
        Err(DeliveryError::AllTransportsFailed { attempts })
    }
}
