//! HTTP form-to-email transport.
//!
//! Tunnels the notification over port 443 to a hosted form-relay service
//! that delivers it to the operator's inbox. This is the transport of choice
//! on hosts that block outbound SMTP ports entirely.

use std::time::Duration;

use async_trait::async_trait;

use crate::{TransportError, notification::Notification, transport::Transport};

/// Default base URL of the hosted form-relay service.
pub const DEFAULT_ENDPOINT_BASE: &str = "https://formsubmit.co";

const fn default_timeout_secs() -> u64 {
    10
}

/// Transport that posts the notification to a hosted form-relay API.
#[derive(Debug)]
pub struct ApiTransport {
    client: Option<reqwest::Client>,
    endpoint: Option<String>,
}

impl ApiTransport {
    /// Build the transport for an operator recipient address.
    ///
    /// The relay endpoint is derived from the recipient; `None` yields an
    /// unconfigured transport whose every send fails fast with
    /// `AuthMissing`.
    #[must_use]
    pub fn new(recipient: Option<String>, endpoint_base: &str) -> Self {
        let Some(recipient) = recipient else {
            tracing::warn!("no recipient address configured, API transport disabled");
            return Self {
                client: None,
                endpoint: None,
            };
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(default_timeout_secs()))
            .build();
        match client {
            Ok(client) => Self {
                client: Some(client),
                endpoint: Some(format!(
                    "{}/{recipient}",
                    endpoint_base.trim_end_matches('/')
                )),
            },
            Err(error) => {
                tracing::warn!(%error, "could not build HTTP client, API transport disabled");
                Self {
                    client: None,
                    endpoint: None,
                }
            }
        }
    }

    /// Returns `true` when the transport has a recipient to deliver to.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }
}

fn classify(error: &reqwest::Error) -> TransportError {
    if error.is_connect() {
        TransportError::ConnectFailed(error.to_string())
    } else {
        TransportError::NetworkError(error.to_string())
    }
}

#[async_trait]
impl Transport for ApiTransport {
    fn name(&self) -> &'static str {
        "api"
    }

    async fn send(&self, notification: &Notification) -> crate::Result<()> {
        let (Some(client), Some(endpoint)) = (&self.client, &self.endpoint) else {
            return Err(TransportError::AuthMissing(
                "no recipient address configured".to_string(),
            ));
        };

        // The relay formats the submission itself; _subject/_template/_captcha
        // are service controls, not message content.
        let payload = [
            ("name", notification.sender_name.as_str()),
            ("email", notification.sender_email.as_str()),
            ("message", notification.content.as_str()),
            ("_subject", notification.subject.as_str()),
            ("_template", "table"),
            ("_captcha", "false"),
        ];

        let response = client
            .post(endpoint)
            .form(&payload)
            .send()
            .await
            .map_err(|e| classify(&e))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(TransportError::RemoteRejected {
                status: status.as_u16(),
            })
        }
    }
}
