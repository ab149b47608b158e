pub mod config;
pub mod error;
pub mod memory;
pub mod record;
pub mod rest;
pub mod r#trait;

pub use config::{MemoryConfig, StoreConfig};
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use record::{MessageId, StoredMessage};
pub use rest::{RestCredentials, RestStore};
pub use r#trait::MessageStore;
