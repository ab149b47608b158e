use async_trait::async_trait;

use crate::notification::Notification;

/// Seam between the delivery strategy and the concrete send mechanisms.
///
/// Each call is a single synchronous attempt against one formatted
/// notification; transports never buffer and never retry on their own.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Stable name used in logs and attempt records.
    fn name(&self) -> &'static str;

    /// Send the notification.
    ///
    /// # Errors
    /// `TransportError::AuthMissing` when the transport was never configured
    /// for this deployment; any other variant for a failed attempt.
    async fn send(&self, notification: &Notification) -> crate::Result<()>;
}
