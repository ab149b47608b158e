//! Test doubles for pipeline integration tests
#![allow(dead_code)] // Test utility module - not all helpers used in every test

use std::sync::Arc;

use async_trait::async_trait;
use postbox_common::{CapturingReporter, ContactMessage};
use postbox_delivery::{DeliveryConfig, DeliveryStrategy};
use postbox_notify::Transport;
use postbox_pipeline::{
    AdmissionConfig, AdmissionControl, PipelineConfig, SubmissionPipeline,
};
use postbox_store::{MessageStore, StoreError, StoredMessage};

/// Store that accepts the request but fails the insert, as a configured
/// backend would on a network fault.
#[derive(Debug, Clone, Default)]
pub struct FailingStore;

#[async_trait]
impl MessageStore for FailingStore {
    async fn save(&self, _message: &ContactMessage) -> postbox_store::Result<StoredMessage> {
        Err(StoreError::Persist("backend returned 500".to_string()))
    }
}

pub fn test_message() -> ContactMessage {
    ContactMessage::new("Ana", "ana@x.com", "Hello")
}

/// Wire a pipeline from parts, with default admission limits.
pub fn pipeline_over(
    store: Arc<dyn MessageStore>,
    transports: Vec<Arc<dyn Transport>>,
    reporter: &CapturingReporter,
    config: PipelineConfig,
) -> SubmissionPipeline {
    let strategy = Arc::new(DeliveryStrategy::new(
        transports,
        DeliveryConfig::default(),
        Arc::new(reporter.clone()),
    ));
    SubmissionPipeline::new(
        store,
        strategy,
        AdmissionControl::new(AdmissionConfig::default()),
        Arc::new(reporter.clone()),
        config,
    )
}
