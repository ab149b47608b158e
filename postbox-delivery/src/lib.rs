//! Delivery strategy for operator notifications.
//!
//! Given one formatted notification, try the configured transports in a
//! fixed priority order until one delivers or the order is exhausted. The
//! strategy applies a per-attempt timeout, records every attempt, and
//! reports failures to the telemetry seam; it never retries beyond one full
//! pass over the list.

mod error;
mod strategy;
mod types;

pub use error::DeliveryError;
pub use strategy::DeliveryStrategy;
pub use types::{AttemptOutcome, DeliveryConfig, DeliveryReport, TransportAttempt, TransportRole};
