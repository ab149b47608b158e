use serde::{Deserialize, Serialize};

/// A visitor-submitted contact message.
///
/// Immutable once constructed. There is no uniqueness constraint anywhere in
/// the pipeline; identical resubmissions are independent entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    /// Name the visitor introduced themselves with
    pub name: String,
    /// Address the operator can reply to
    pub sender_email: String,
    /// The message body
    pub content: String,
}

impl ContactMessage {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        sender_email: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            sender_email: sender_email.into(),
            content: content.into(),
        }
    }
}

/// Network identity of the submitting client, as reported by the caller.
///
/// Opaque to the pipeline; only admission control keys on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(String);

impl ClientId {
    #[must_use]
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClientId {
    fn from(identity: &str) -> Self {
        Self(identity.to_string())
    }
}
