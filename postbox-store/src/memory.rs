use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use async_trait::async_trait;
use postbox_common::ContactMessage;
use tokio::sync::Notify;

use crate::{
    StoreError,
    record::{MessageId, StoredMessage},
    r#trait::MessageStore,
};

/// In-memory message store.
///
/// Records live in a `HashMap` protected by an `RwLock`. Primarily intended
/// for tests and transient deployments, but behaves like any other store:
/// append-only, store-assigned identifiers, no mutation.
///
/// # Capacity Management
/// An optional capacity limit makes saves fail once the store is full, which
/// is useful for exercising the pipeline's degraded paths.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    records: Arc<RwLock<HashMap<MessageId, StoredMessage>>>,
    /// Maximum number of records to keep (None = unlimited)
    capacity: Option<usize>,
    notify: Arc<Notify>,
}

impl MemoryStore {
    /// Create a new empty store with unlimited capacity
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            capacity: None,
            notify: Arc::new(Notify::new()),
        }
    }

    /// Create a new store with a capacity limit
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            capacity: Some(capacity),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Get the current number of records in the store
    ///
    /// Recovers gracefully if the lock is poisoned by accessing the
    /// underlying data.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Check if the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the configured capacity (None = unlimited)
    #[must_use]
    pub const fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// All records, sorted by identifier (arrival order, since the ids are
    /// ULIDs)
    #[must_use]
    pub fn records(&self) -> Vec<StoredMessage> {
        let mut records: Vec<_> = self
            .records
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        records
    }

    /// Get a single record by id
    #[must_use]
    pub fn get(&self, id: &MessageId) -> Option<StoredMessage> {
        self.records
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Wait until at least `expected` records have been saved, with timeout.
    ///
    /// Useful in tests to observe saves that happen on detached tasks.
    ///
    /// # Errors
    /// Returns an error if the timeout is reached before the expected count
    pub async fn wait_for_count(
        &self,
        expected: usize,
        timeout: std::time::Duration,
    ) -> crate::Result<()> {
        tokio::time::timeout(timeout, async {
            loop {
                if self.len() >= expected {
                    return;
                }
                self.notify.notified().await;
            }
        })
        .await
        .map_err(|e| StoreError::Internal(format!("Timeout waiting for records: {e}")))?;
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn save(&self, message: &ContactMessage) -> crate::Result<StoredMessage> {
        if let Some(capacity) = self.capacity
            && self.len() >= capacity
        {
            return Err(StoreError::CapacityExceeded {
                current: self.len(),
                capacity,
            });
        }

        let record = StoredMessage::assign(message);
        self.records
            .write()?
            .insert(record.id.clone(), record.clone());
        self.notify.notify_waiters();

        Ok(record)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn test_message(content: &str) -> ContactMessage {
        ContactMessage::new("Ana", "ana@x.com", content)
    }

    #[tokio::test]
    async fn test_memory_store_basic_operations() {
        let store = MemoryStore::new();
        let record = store.save(&test_message("Hello")).await.expect("save");

        assert_eq!(store.len(), 1);
        let read = store.get(&record.id).expect("record exists");
        assert_eq!(read.content, "Hello");
        assert_eq!(read.created_at, record.created_at);
    }

    #[tokio::test]
    async fn test_memory_store_capacity_limit() {
        let store = MemoryStore::with_capacity(2);

        store.save(&test_message("one")).await.expect("first save");
        store.save(&test_message("two")).await.expect("second save");

        let result = store.save(&test_message("three")).await;
        assert!(matches!(
            result,
            Err(StoreError::CapacityExceeded {
                current: 2,
                capacity: 2
            })
        ));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_records_listed_in_arrival_order() {
        let store = MemoryStore::new();
        for i in 0..10 {
            store
                .save(&test_message(&format!("message {i}")))
                .await
                .expect("save");
        }

        let records = store.records();
        assert_eq!(records.len(), 10);
        for window in records.windows(2) {
            assert!(window[0].id < window[1].id);
        }
    }

    #[tokio::test]
    async fn test_concurrent_saves_get_unique_ids() {
        let store = MemoryStore::new();

        let mut handles = vec![];
        for i in 0..100 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.save(&test_message(&format!("message {i}"))).await
            }));
        }
        for handle in handles {
            handle.await.expect("task").expect("save");
        }

        let ids: std::collections::HashSet<_> =
            store.records().into_iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_capacity_methods() {
        assert_eq!(MemoryStore::new().capacity(), None);
        assert_eq!(MemoryStore::with_capacity(100).capacity(), Some(100));
    }
}
