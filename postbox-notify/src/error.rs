//! Error types for the notification transports.

use thiserror::Error;

/// Errors a transport can report for one send attempt.
///
/// The delivery strategy distinguishes config-level failures (the transport
/// was never usable) from connection-level ones (the transport was usable
/// but the attempt failed); both advance the strategy to the next transport
/// in the priority order.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Required credentials or addresses are not configured.
    #[error("transport credentials missing: {0}")]
    AuthMissing(String),

    /// Could not establish a connection to the remote end.
    #[error("connect failed: {0}")]
    ConnectFailed(String),

    /// The remote end rejected our credentials.
    #[error("authentication rejected: {0}")]
    AuthRejected(String),

    /// The attempt failed in transit (I/O error, timeout, dropped
    /// connection).
    #[error("network error: {0}")]
    NetworkError(String),

    /// The remote end processed the request and refused it.
    #[error("remote rejected with status {status}")]
    RemoteRejected { status: u16 },
}

impl TransportError {
    /// Returns `true` for config-level failures, which mean the transport
    /// cannot work at all in this deployment.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::AuthMissing(_))
    }

    /// Returns `true` for connection-level failures, where another transport
    /// may well succeed.
    #[must_use]
    pub const fn is_connection_error(&self) -> bool {
        matches!(self, Self::ConnectFailed(_) | Self::NetworkError(_))
    }
}

/// Specialized `Result` type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;
