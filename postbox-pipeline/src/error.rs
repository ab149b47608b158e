//! Caller-visible submission failures.

use std::time::Duration;

use thiserror::Error;

/// The only errors a caller ever sees from the pipeline.
///
/// Store and transport failures are absorbed into the delivery outcome; the
/// caller never receives their internal detail.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// Structural validation failed; nothing was persisted or sent.
    #[error("invalid submission: {0}")]
    Validation(&'static str),

    /// The client exceeded its admission window; nothing was persisted or
    /// sent.
    #[error("rate limit exceeded, retry in {}s", retry_after.as_secs())]
    AdmissionDenied { retry_after: Duration },
}
