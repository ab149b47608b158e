pub mod config;

pub use config::{Config, DeliverySection, NotifySection, PrimaryTransport};
