//! Integration tests for the submission pipeline
#![allow(clippy::unwrap_used)]

mod support;

use std::{sync::Arc, time::Duration};

use postbox_common::{CapturingReporter, ClientId, ContactMessage};
use postbox_delivery::{DeliveryConfig, DeliveryStrategy};
use postbox_notify::{StubTransport, TransportError};
use postbox_pipeline::{
    AdmissionConfig, AdmissionControl, DeliveryMode, DeliveryOutcome, PipelineConfig,
    SubmissionError, SubmissionPipeline,
};
use postbox_store::{MemoryStore, RestStore};
use support::{FailingStore, pipeline_over, test_message};

fn client() -> ClientId {
    ClientId::from("203.0.113.7")
}

#[tokio::test]
async fn test_happy_path_persists_and_delivers_once() {
    let store = MemoryStore::new();
    let transport = StubTransport::new("api");
    let reporter = CapturingReporter::new();
    let pipeline = pipeline_over(
        Arc::new(store.clone()),
        vec![Arc::new(transport.clone())],
        &reporter,
        PipelineConfig::default(),
    );

    let outcome = pipeline.submit(test_message(), &client()).await.unwrap();

    assert_eq!(outcome, DeliveryOutcome::FullSuccess);
    assert_eq!(transport.sent_count(), 1);
    let records = store.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Ana");
    assert_eq!(records[0].sender_email, "ana@x.com");
    assert_eq!(records[0].content, "Hello");
    assert_eq!(reporter.count(), 0);
}

#[tokio::test]
async fn test_record_persists_regardless_of_transport_outcome() {
    let store = MemoryStore::new();
    let transport = StubTransport::new("api");
    transport.push_failure(TransportError::RemoteRejected { status: 502 });
    let reporter = CapturingReporter::new();
    let pipeline = pipeline_over(
        Arc::new(store.clone()),
        vec![Arc::new(transport)],
        &reporter,
        PipelineConfig::default(),
    );

    let outcome = pipeline.submit(test_message(), &client()).await.unwrap();

    assert_eq!(outcome, DeliveryOutcome::PartialSuccess);
    assert_eq!(store.records().len(), 1);
    assert_eq!(store.records()[0].content, "Hello");
}

#[tokio::test]
async fn test_connection_failure_falls_back_and_succeeds() {
    let store = MemoryStore::new();
    let primary = StubTransport::new("api");
    primary.push_failure(TransportError::ConnectFailed("refused".to_string()));
    let secondary = StubTransport::new("smtp-implicit");
    let reporter = CapturingReporter::new();
    let pipeline = pipeline_over(
        Arc::new(store.clone()),
        vec![Arc::new(primary.clone()), Arc::new(secondary.clone())],
        &reporter,
        PipelineConfig::default(),
    );

    let outcome = pipeline.submit(test_message(), &client()).await.unwrap();

    assert_eq!(outcome, DeliveryOutcome::FullSuccess);
    // Exactly two transport attempts: the failed primary and the delivering
    // secondary
    assert_eq!(primary.sent_count(), 1);
    assert_eq!(secondary.sent_count(), 1);
}

#[tokio::test]
async fn test_auth_missing_on_primary_still_tries_secondary() {
    let store = MemoryStore::new();
    let primary = StubTransport::new("api");
    primary.push_failure(TransportError::AuthMissing("no API key".to_string()));
    let secondary = StubTransport::new("smtp-implicit");
    let reporter = CapturingReporter::new();
    let pipeline = pipeline_over(
        Arc::new(store.clone()),
        vec![Arc::new(primary), Arc::new(secondary.clone())],
        &reporter,
        PipelineConfig::default(),
    );

    let outcome = pipeline.submit(test_message(), &client()).await.unwrap();

    assert_eq!(outcome, DeliveryOutcome::FullSuccess);
    assert_eq!(secondary.sent_count(), 1);
}

#[tokio::test]
async fn test_all_transports_failing_still_reads_as_accepted() {
    let store = MemoryStore::new();
    let primary = StubTransport::new("api");
    primary.push_failure(TransportError::NetworkError("timed out".to_string()));
    let secondary = StubTransport::new("smtp-implicit");
    secondary.push_failure(TransportError::ConnectFailed("refused".to_string()));
    let reporter = CapturingReporter::new();
    let pipeline = pipeline_over(
        Arc::new(store.clone()),
        vec![Arc::new(primary), Arc::new(secondary)],
        &reporter,
        PipelineConfig::default(),
    );

    let outcome = pipeline.submit(test_message(), &client()).await.unwrap();

    assert_eq!(outcome, DeliveryOutcome::PartialSuccess);
    assert_eq!(store.records().len(), 1);
}

#[tokio::test]
async fn test_sixth_submission_is_denied_with_no_side_effects() {
    let store = MemoryStore::new();
    let transport = StubTransport::new("api");
    let reporter = CapturingReporter::new();
    let pipeline = pipeline_over(
        Arc::new(store.clone()),
        vec![Arc::new(transport.clone())],
        &reporter,
        PipelineConfig::default(),
    );
    let client = client();

    for _ in 0..5 {
        pipeline.submit(test_message(), &client).await.unwrap();
    }
    let result = pipeline.submit(test_message(), &client).await;

    assert!(matches!(
        result,
        Err(SubmissionError::AdmissionDenied { .. })
    ));
    // The denied submission wrote nothing and attempted no transport
    assert_eq!(store.records().len(), 5);
    assert_eq!(transport.sent_count(), 5);
}

#[tokio::test]
async fn test_unavailable_store_still_attempts_delivery() {
    // A store built without credentials fails fast; the submission is still
    // accepted on the strength of the notification alone.
    let store = RestStore::from_credentials(None);
    let transport = StubTransport::new("api");
    let reporter = CapturingReporter::new();
    let pipeline = pipeline_over(
        Arc::new(store),
        vec![Arc::new(transport.clone())],
        &reporter,
        PipelineConfig::default(),
    );

    let outcome = pipeline.submit(test_message(), &client()).await.unwrap();

    assert_eq!(outcome, DeliveryOutcome::PartialSuccess);
    assert_eq!(transport.sent_count(), 1);
    assert_eq!(reporter.count(), 1);
    assert!(reporter.reports()[0].0.contains("store unavailable"));
}

#[tokio::test]
async fn test_persist_failure_caps_outcome_even_when_delivery_succeeds() {
    let transport = StubTransport::new("api");
    let reporter = CapturingReporter::new();
    let pipeline = pipeline_over(
        Arc::new(FailingStore),
        vec![Arc::new(transport.clone())],
        &reporter,
        PipelineConfig::default(),
    );

    let outcome = pipeline.submit(test_message(), &client()).await.unwrap();

    assert_eq!(outcome, DeliveryOutcome::PartialSuccess);
    assert_eq!(transport.sent_count(), 1);
}

#[tokio::test]
async fn test_validation_failure_leaves_no_trace() {
    let store = MemoryStore::new();
    let transport = StubTransport::new("api");
    let reporter = CapturingReporter::new();
    let pipeline = pipeline_over(
        Arc::new(store.clone()),
        vec![Arc::new(transport.clone())],
        &reporter,
        PipelineConfig::default(),
    );

    let result = pipeline
        .submit(ContactMessage::new("", "ana@x.com", "Hello"), &client())
        .await;

    assert!(matches!(result, Err(SubmissionError::Validation(_))));
    assert!(store.is_empty());
    assert_eq!(transport.sent_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_primary_timeout_then_secondary_delivers() {
    let store = MemoryStore::new();
    // The primary hangs well past the attempt timeout; the secondary answers
    // quickly.
    let primary = StubTransport::new("api").with_delay(Duration::from_secs(300));
    let secondary =
        StubTransport::new("smtp-implicit").with_delay(Duration::from_millis(50));
    let reporter = CapturingReporter::new();
    let strategy = Arc::new(DeliveryStrategy::new(
        vec![Arc::new(primary), Arc::new(secondary.clone())],
        DeliveryConfig::default(),
        Arc::new(reporter.clone()),
    ));
    let pipeline = SubmissionPipeline::new(
        Arc::new(store.clone()),
        strategy,
        AdmissionControl::new(AdmissionConfig::default()),
        Arc::new(reporter.clone()),
        PipelineConfig::default(),
    );

    let started = tokio::time::Instant::now();
    let outcome = pipeline.submit(test_message(), &client()).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(outcome, DeliveryOutcome::FullSuccess);
    assert_eq!(secondary.sent_count(), 1);
    // Elapsed is the attempt timeout plus the secondary's latency, not the
    // stuck primary's
    assert!(elapsed >= Duration::from_secs(10));
    assert!(elapsed < Duration::from_secs(11));
}

#[tokio::test]
async fn test_background_mode_answers_before_delivery_completes() {
    let store = MemoryStore::new();
    let transport = StubTransport::new("api").with_delay(Duration::from_millis(50));
    let reporter = CapturingReporter::new();
    let pipeline = pipeline_over(
        Arc::new(store.clone()),
        vec![Arc::new(transport.clone())],
        &reporter,
        PipelineConfig {
            mode: DeliveryMode::Background,
        },
    );

    let outcome = pipeline.submit(test_message(), &client()).await.unwrap();

    // Accepted and durably stored; the delivery result is not awaited
    assert_eq!(outcome, DeliveryOutcome::FullSuccess);
    assert_eq!(store.records().len(), 1);

    // The detached task still delivers
    transport
        .wait_for_count(1, Duration::from_secs(5))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_background_mode_with_failed_persistence_is_partial() {
    let transport = StubTransport::new("api");
    let reporter = CapturingReporter::new();
    let pipeline = pipeline_over(
        Arc::new(FailingStore),
        vec![Arc::new(transport.clone())],
        &reporter,
        PipelineConfig {
            mode: DeliveryMode::Background,
        },
    );

    let outcome = pipeline.submit(test_message(), &client()).await.unwrap();

    assert_eq!(outcome, DeliveryOutcome::PartialSuccess);
    transport
        .wait_for_count(1, Duration::from_secs(5))
        .await
        .unwrap();
}
