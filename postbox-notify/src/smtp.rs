//! SMTP relay transport.
//!
//! One relay, two wire modes: TLS-on-connect (the classic submission port
//! 465) and plaintext-then-STARTTLS (port 587). Which mode a deployment
//! leads with depends on what its host leaves unblocked, so the delivery
//! strategy can carry both as separate entries in its priority order.
//!
//! The underlying mailer owns the socket and credential lifecycle, so
//! connections are released on every exit path.

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use serde::Deserialize;

use crate::{TransportError, notification::Notification, transport::Transport};

/// How the connection to the relay is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpMode {
    /// TLS from the first byte (port 465)
    Implicit,
    /// Plaintext connection upgraded via STARTTLS (port 587)
    StartTls,
}

impl SmtpMode {
    /// Conventional port for this mode.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Implicit => 465,
            Self::StartTls => 587,
        }
    }
}

const fn default_implicit_port() -> u16 {
    465
}

const fn default_starttls_port() -> u16 {
    587
}

/// Relay location and credentials.
///
/// Every field is optional; an incomplete section leaves the transport
/// disabled rather than failing startup.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    /// Hostname of the relay
    #[serde(default)]
    pub host: Option<String>,
    /// Port used in implicit-TLS mode
    #[serde(default = "default_implicit_port")]
    pub implicit_port: u16,
    /// Port used in STARTTLS mode
    #[serde(default = "default_starttls_port")]
    pub starttls_port: u16,
    /// Login for the relay
    #[serde(default)]
    pub username: Option<String>,
    /// Password or app token for the relay
    #[serde(default)]
    pub password: Option<String>,
    /// Envelope/header sender address
    #[serde(default)]
    pub from: Option<String>,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: None,
            implicit_port: default_implicit_port(),
            starttls_port: default_starttls_port(),
            username: None,
            password: None,
            from: None,
        }
    }
}

struct Ready {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

/// Transport that submits the notification to an SMTP relay.
pub struct SmtpTransport {
    mode: SmtpMode,
    inner: Option<Ready>,
}

impl std::fmt::Debug for SmtpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpTransport")
            .field("mode", &self.mode)
            .field("configured", &self.inner.is_some())
            .finish()
    }
}

impl SmtpTransport {
    /// Build the transport for one wire mode.
    ///
    /// Missing host, credentials, sender, or recipient (or addresses that
    /// do not parse) leave the transport disabled: every send fails fast
    /// with `AuthMissing` without opening a connection.
    #[must_use]
    pub fn from_config(config: &SmtpConfig, recipient: Option<&str>, mode: SmtpMode) -> Self {
        let (Some(host), Some(username), Some(password), Some(from), Some(recipient)) = (
            config.host.as_deref(),
            config.username.as_deref(),
            config.password.as_deref(),
            config.from.as_deref(),
            recipient,
        ) else {
            tracing::warn!(mode = ?mode, "relay settings incomplete, SMTP transport disabled");
            return Self { mode, inner: None };
        };

        let (Ok(from), Ok(to)) = (from.parse::<Mailbox>(), recipient.parse::<Mailbox>()) else {
            tracing::warn!(mode = ?mode, "sender or recipient address does not parse, SMTP transport disabled");
            return Self { mode, inner: None };
        };

        let builder = match mode {
            SmtpMode::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(host),
            SmtpMode::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host),
        };
        let Ok(builder) = builder else {
            tracing::warn!(mode = ?mode, host, "relay address rejected, SMTP transport disabled");
            return Self { mode, inner: None };
        };

        let port = match mode {
            SmtpMode::Implicit => config.implicit_port,
            SmtpMode::StartTls => config.starttls_port,
        };
        let mailer = builder
            .port(port)
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .build();

        Self {
            mode,
            inner: Some(Ready { mailer, from, to }),
        }
    }

    /// Returns `true` when the relay settings were complete.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.inner.is_some()
    }

    /// The wire mode this instance uses.
    #[must_use]
    pub const fn mode(&self) -> SmtpMode {
        self.mode
    }
}

fn classify(error: &lettre::transport::smtp::Error) -> TransportError {
    if let Some(code) = error.status() {
        let status = code.to_string().parse::<u16>().unwrap_or_default();
        // 535 is the relay refusing the credentials themselves
        if status == 535 {
            TransportError::AuthRejected(error.to_string())
        } else {
            TransportError::RemoteRejected { status }
        }
    } else if error.is_timeout() {
        TransportError::NetworkError(error.to_string())
    } else {
        // TLS failures, refused connections, dropped sockets
        TransportError::ConnectFailed(error.to_string())
    }
}

#[async_trait]
impl Transport for SmtpTransport {
    fn name(&self) -> &'static str {
        match self.mode {
            SmtpMode::Implicit => "smtp-implicit",
            SmtpMode::StartTls => "smtp-starttls",
        }
    }

    async fn send(&self, notification: &Notification) -> crate::Result<()> {
        let Some(ready) = &self.inner else {
            return Err(TransportError::AuthMissing(
                "relay settings incomplete".to_string(),
            ));
        };

        let mut builder = Message::builder()
            .from(ready.from.clone())
            .to(ready.to.clone())
            .subject(notification.subject.clone())
            .header(ContentType::TEXT_PLAIN);

        // Reply-to lets the operator answer the visitor directly; skip it if
        // the visitor address does not parse as a mailbox.
        let reply_to = format!(
            "{} <{}>",
            notification.sender_name, notification.sender_email
        );
        if let Ok(reply_to) = reply_to.parse::<Mailbox>() {
            builder = builder.reply_to(reply_to);
        }

        let message = builder
            .body(notification.body.clone())
            .map_err(|e| TransportError::NetworkError(format!("message build failed: {e}")))?;

        ready
            .mailer
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| classify(&e))
    }
}
