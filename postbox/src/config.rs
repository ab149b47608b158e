//! Process configuration.
//!
//! One immutable value constructed at startup; nothing reads ambient state
//! after this point. Every credential section is optional; a missing set
//! degrades the owning component to its fail-fast mode instead of failing
//! the load.
//!
//! # Example
//!
//! ```toml
//! [store]
//! type = "Rest"
//! url = "https://abc123.supabase.co"
//! service_key = "service-role-key"
//!
//! [notify]
//! recipient = "operator@example.com"
//!
//! [notify.smtp]
//! host = "smtp.example.com"
//! username = "operator"
//! password = "app-token"
//! from = "noreply@example.com"
//!
//! [delivery]
//! primary = "api"
//! attempt_timeout_secs = 10
//!
//! [pipeline]
//! mode = "background"
//! ```

use std::{path::Path, sync::Arc};

use postbox_common::Reporter;
use postbox_delivery::{DeliveryConfig, DeliveryStrategy};
use postbox_notify::{ApiTransport, SmtpConfig, SmtpMode, SmtpTransport, Transport, api};
use postbox_pipeline::{AdmissionConfig, AdmissionControl, PipelineConfig, SubmissionPipeline};
use postbox_store::StoreConfig;
use serde::Deserialize;

/// Which transport leads the delivery order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryTransport {
    /// HTTP form-relay first (hosts that block SMTP ports)
    #[default]
    Api,
    /// SMTP relay first, both wire modes before the HTTP fallback
    Smtp,
}

/// The `[notify]` section: recipient and transport settings.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifySection {
    /// Operator address notifications are delivered to
    #[serde(default)]
    pub recipient: Option<String>,

    /// Base URL of the hosted form-relay service
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,

    /// SMTP relay settings, shared by both wire modes
    #[serde(default)]
    pub smtp: SmtpConfig,
}

impl Default for NotifySection {
    fn default() -> Self {
        Self {
            recipient: None,
            api_endpoint: default_api_endpoint(),
            smtp: SmtpConfig::default(),
        }
    }
}

fn default_api_endpoint() -> String {
    api::DEFAULT_ENDPOINT_BASE.to_string()
}

/// The `[delivery]` section: transport order plus strategy tunables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeliverySection {
    #[serde(default)]
    pub primary: PrimaryTransport,

    #[serde(flatten)]
    pub strategy: DeliveryConfig,
}

/// Everything the process reads at startup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub notify: NotifySection,

    #[serde(default)]
    pub delivery: DeliverySection,

    #[serde(default)]
    pub admission: AdmissionConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Load the configuration from a TOML file.
    ///
    /// # Errors
    /// If the file cannot be read or does not parse
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Wire the configured components into a ready pipeline.
    ///
    /// The delivery order is the observed port-fallback evolution expressed
    /// as one list: the HTTP relay and both SMTP wire modes, led by
    /// whichever the deployment marks primary. Unconfigured transports stay
    /// in the order and fail fast, which keeps the fallback path identical
    /// across deployments.
    #[must_use]
    pub fn build(self, reporter: Arc<dyn Reporter>) -> SubmissionPipeline {
        let store = self.store.into_store();

        let recipient = self.notify.recipient;
        let api: Arc<dyn Transport> = Arc::new(ApiTransport::new(
            recipient.clone(),
            &self.notify.api_endpoint,
        ));
        let smtp_implicit: Arc<dyn Transport> = Arc::new(SmtpTransport::from_config(
            &self.notify.smtp,
            recipient.as_deref(),
            SmtpMode::Implicit,
        ));
        let smtp_starttls: Arc<dyn Transport> = Arc::new(SmtpTransport::from_config(
            &self.notify.smtp,
            recipient.as_deref(),
            SmtpMode::StartTls,
        ));

        let transports = order_transports(self.delivery.primary, api, smtp_implicit, smtp_starttls);

        let strategy = Arc::new(DeliveryStrategy::new(
            transports,
            self.delivery.strategy,
            Arc::clone(&reporter),
        ));
        tracing::info!(order = ?strategy.transport_names(), "delivery order configured");

        SubmissionPipeline::new(
            store,
            strategy,
            AdmissionControl::new(self.admission),
            reporter,
            self.pipeline,
        )
    }
}

fn order_transports(
    primary: PrimaryTransport,
    api: Arc<dyn Transport>,
    smtp_implicit: Arc<dyn Transport>,
    smtp_starttls: Arc<dyn Transport>,
) -> Vec<Arc<dyn Transport>> {
    match primary {
        PrimaryTransport::Api => vec![api, smtp_implicit, smtp_starttls],
        PrimaryTransport::Smtp => vec![smtp_implicit, smtp_starttls, api],
    }
}
