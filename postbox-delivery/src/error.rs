//! Typed error handling for delivery runs.

use thiserror::Error;

use crate::types::TransportAttempt;

/// Errors surfaced by the delivery strategy.
///
/// There is exactly one: the ordered transport list was exhausted. Everything
/// softer (a single transport failing) stays inside the strategy as an
/// attempt record.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Every transport in the priority order was tried once and failed.
    #[error("all transports failed after {} attempts", attempts.len())]
    AllTransportsFailed { attempts: Vec<TransportAttempt> },
}

impl DeliveryError {
    /// The attempts made before giving up.
    #[must_use]
    pub fn attempts(&self) -> &[TransportAttempt] {
        match self {
            Self::AllTransportsFailed { attempts } => attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AttemptOutcome, TransportRole};

    #[test]
    fn test_error_display_counts_attempts() {
        let error = DeliveryError::AllTransportsFailed {
            attempts: vec![
                TransportAttempt {
                    transport: "api",
                    role: TransportRole::Primary,
                    outcome: AttemptOutcome::Failed,
                    error: Some("network error: timed out".to_string()),
                },
                TransportAttempt {
                    transport: "smtp-implicit",
                    role: TransportRole::Fallback,
                    outcome: AttemptOutcome::Failed,
                    error: Some("connect failed: refused".to_string()),
                },
            ],
        };
        assert_eq!(error.to_string(), "all transports failed after 2 attempts");
        assert_eq!(error.attempts().len(), 2);
    }
}
