use chrono::{DateTime, Utc};
use postbox_common::ContactMessage;
use serde::{Deserialize, Serialize};

/// Identifier for a persisted contact message.
///
/// ULIDs are lexicographically sortable by creation time and collision
/// resistant, so records list in arrival order without a separate sequence
/// column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId {
    id: ulid::Ulid,
}

impl MessageId {
    /// Create a message ID from an existing ULID
    #[must_use]
    pub const fn new(id: ulid::Ulid) -> Self {
        Self { id }
    }

    /// Generate a new unique message ID
    #[must_use]
    pub fn generate() -> Self {
        Self {
            id: ulid::Ulid::new(),
        }
    }

    /// Get the underlying ULID
    #[must_use]
    pub const fn ulid(&self) -> ulid::Ulid {
        self.id
    }

    /// Get the timestamp (milliseconds since Unix epoch) encoded in this ULID
    #[must_use]
    pub const fn timestamp_ms(&self) -> u64 {
        self.id.timestamp_ms()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl serde::Serialize for MessageId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.id.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for MessageId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let id = ulid::Ulid::from_string(&s).map_err(serde::de::Error::custom)?;
        Ok(Self { id })
    }
}

/// A contact message as persisted: the submitted fields plus the
/// store-assigned identifier and creation timestamp.
///
/// Owned exclusively by the store. Created on successful persistence, never
/// mutated, never deleted by this subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: MessageId,
    pub name: String,
    pub sender_email: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl StoredMessage {
    /// Assign an identifier and creation timestamp to a submitted message.
    #[must_use]
    pub fn assign(message: &ContactMessage) -> Self {
        Self {
            id: MessageId::generate(),
            name: message.name.clone(),
            sender_email: message.sender_email.clone(),
            content: message.content.clone(),
            created_at: Utc::now(),
        }
    }
}
