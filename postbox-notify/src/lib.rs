pub mod api;
pub mod error;
pub mod notification;
pub mod smtp;
pub mod stub;
pub mod transport;

pub use api::ApiTransport;
pub use error::{Result, TransportError};
pub use notification::Notification;
pub use smtp::{SmtpConfig, SmtpMode, SmtpTransport};
pub use stub::StubTransport;
pub use transport::Transport;
