//! Fire-and-forget error reporting.
//!
//! Failure branches in the store, delivery strategy, and pipeline hand
//! `(error, context)` pairs to a [`Reporter`]. Reporting never blocks and
//! never alters control flow; a reporter that drops everything is a valid
//! implementation.

use std::sync::{Arc, Mutex};

/// Sink for error reports from the pipeline's failure branches.
pub trait Reporter: Send + Sync + std::fmt::Debug {
    /// Record one error with a short description of where it happened.
    fn report(&self, error: &str, context: &str);
}

/// Reporter that emits structured tracing events.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, error: &str, context: &str) {
        tracing::warn!(context, error, "error reported");
    }
}

/// Reporter that discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _error: &str, _context: &str) {}
}

/// Reporter that keeps every report in memory for test assertions.
#[derive(Debug, Clone, Default)]
pub struct CapturingReporter {
    reports: Arc<Mutex<Vec<(String, String)>>>,
}

impl CapturingReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All `(error, context)` pairs reported so far.
    #[must_use]
    pub fn reports(&self) -> Vec<(String, String)> {
        self.reports
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.reports
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }
}

impl Reporter for CapturingReporter {
    fn report(&self, error: &str, context: &str) {
        self.reports
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((error.to_string(), context.to_string()));
    }
}
