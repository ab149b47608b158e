pub mod logging;
pub mod message;
pub mod telemetry;

pub use message::{ClientId, ContactMessage};
pub use telemetry::{CapturingReporter, LogReporter, NullReporter, Reporter};
pub use tracing;
