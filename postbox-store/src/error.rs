//! Error types for the postbox-store crate.

use thiserror::Error;

/// Top-level store error type.
///
/// `Unavailable` is the fail-fast mode of a store constructed without
/// backing credentials; `Persist` covers request-level failures against a
/// configured backend. Neither is fatal to a submission: the pipeline
/// absorbs both and downgrades the outcome.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store has no backing credentials configured; every call fails
    /// fast rather than blocking or crashing the process.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The backend failed or rejected the insert.
    #[error("persist failed: {0}")]
    Persist(String),

    /// Memory store capacity reached.
    #[error("store capacity exceeded: {current}/{capacity} messages")]
    CapacityExceeded { current: usize, capacity: usize },

    /// Internal error (lock poisoning, etc.).
    #[error("internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Returns `true` if the store was never configured at all.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Specialized `Result` type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

// Convenience conversion for lock poisoning
impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        Self::Internal(format!("Lock poisoned: {e}"))
    }
}
