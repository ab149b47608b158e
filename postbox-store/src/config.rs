use std::sync::Arc;

use serde::Deserialize;

use crate::{
    memory::MemoryStore,
    rest::{RestCredentials, RestStore},
    r#trait::MessageStore,
};

/// Configuration for the message store backing implementation.
///
/// Allows runtime selection of the backend through the configuration file.
///
/// # Examples
///
/// REST backend in TOML config:
/// ```toml
/// [store]
/// type = "Rest"
/// url = "https://abc123.supabase.co"
/// service_key = "..."
/// ```
///
/// In-memory store with a capacity limit:
/// ```toml
/// [store]
/// type = "Memory"
/// capacity = 1000
/// ```
///
/// Absent credentials are representable: `Disabled` (the default) builds a
/// store whose every save fails fast as unavailable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "type")]
pub enum StoreConfig {
    /// Hosted REST backend (production)
    Rest(RestCredentials),
    /// In-memory store (testing/transient)
    Memory(MemoryConfig),
    /// No backing store; persistence is reported as unavailable
    #[default]
    Disabled,
}

/// Configuration for the in-memory store
#[derive(Debug, Clone, Deserialize, Default)]
pub struct MemoryConfig {
    /// Maximum number of records to keep (omit for unlimited)
    #[serde(default)]
    pub capacity: Option<usize>,
}

impl StoreConfig {
    /// Convert the configuration into a concrete store.
    ///
    /// This consumes the config and returns an Arc'd trait object that can
    /// be used polymorphically throughout the pipeline.
    #[must_use]
    pub fn into_store(self) -> Arc<dyn MessageStore> {
        match self {
            Self::Rest(credentials) => Arc::new(RestStore::from_credentials(Some(credentials))),
            Self::Memory(config) => match config.capacity {
                Some(capacity) => Arc::new(MemoryStore::with_capacity(capacity)),
                None => Arc::new(MemoryStore::new()),
            },
            Self::Disabled => Arc::new(RestStore::from_credentials(None)),
        }
    }
}
