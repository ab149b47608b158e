//! REST-backed message store.
//!
//! The production deployment persists rows through a hosted Postgres REST
//! gateway: one authenticated `POST` of one JSON row per save. A store built
//! without credentials still constructs, but every call fails fast with
//! [`StoreError::Unavailable`] so the rest of the pipeline can carry on.

use std::time::Duration;

use async_trait::async_trait;
use postbox_common::ContactMessage;
use serde::Deserialize;

use crate::{StoreError, record::StoredMessage, r#trait::MessageStore};

const fn default_timeout_secs() -> u64 {
    10
}

fn default_table() -> String {
    "messages".to_string()
}

/// Credentials and location of the REST backend.
#[derive(Debug, Clone, Deserialize)]
pub struct RestCredentials {
    /// Base URL of the backend, e.g. `https://abc123.supabase.co`
    pub url: String,
    /// Service key sent as both `apikey` and bearer token
    pub service_key: String,
    /// Table the rows are appended to
    #[serde(default = "default_table")]
    pub table: String,
    /// Request timeout for one insert
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug)]
struct Configured {
    client: reqwest::Client,
    endpoint: String,
    service_key: String,
}

/// Message store backed by a hosted REST API.
#[derive(Debug)]
pub struct RestStore {
    inner: Option<Configured>,
}

impl RestStore {
    /// Build a store from optional credentials.
    ///
    /// `None` yields an unconfigured instance whose `save` always returns
    /// [`StoreError::Unavailable`].
    #[must_use]
    pub fn from_credentials(credentials: Option<RestCredentials>) -> Self {
        let Some(credentials) = credentials else {
            tracing::warn!("store credentials missing, persistence disabled");
            return Self { inner: None };
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(credentials.timeout_secs))
            .build();
        match client {
            Ok(client) => Self {
                inner: Some(Configured {
                    client,
                    endpoint: format!(
                        "{}/rest/v1/{}",
                        credentials.url.trim_end_matches('/'),
                        credentials.table
                    ),
                    service_key: credentials.service_key,
                }),
            },
            Err(error) => {
                tracing::warn!(%error, "could not build HTTP client, persistence disabled");
                Self { inner: None }
            }
        }
    }

    /// Returns `true` when the store has a backend to talk to.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.inner.is_some()
    }
}

#[async_trait]
impl MessageStore for RestStore {
    async fn save(&self, message: &ContactMessage) -> crate::Result<StoredMessage> {
        let Some(configured) = &self.inner else {
            return Err(StoreError::Unavailable(
                "no backing credentials configured".to_string(),
            ));
        };

        let record = StoredMessage::assign(message);

        let response = configured
            .client
            .post(&configured.endpoint)
            .header("apikey", &configured.service_key)
            .bearer_auth(&configured.service_key)
            .header("Prefer", "return=minimal")
            .json(&record)
            .send()
            .await
            .map_err(|e| StoreError::Persist(format!("request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            Ok(record)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(StoreError::Persist(format!(
                "backend returned {status}: {body}"
            )))
        }
    }
}
