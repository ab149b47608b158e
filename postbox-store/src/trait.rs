use async_trait::async_trait;
use postbox_common::ContactMessage;

use crate::record::StoredMessage;

/// Append-only persistence seam for submitted contact messages.
///
/// One durable row per call; there is no read-modify-write at this layer, so
/// implementations need no transaction or locking discipline beyond their
/// own internal synchronisation.
#[async_trait]
pub trait MessageStore: Send + Sync + std::fmt::Debug {
    /// Persist one message as a new record.
    ///
    /// # Errors
    /// `StoreError::Unavailable` if the store has no backing credentials,
    /// `StoreError::Persist` if the backend fails or rejects the insert.
    async fn save(&self, message: &ContactMessage) -> crate::Result<StoredMessage>;
}
