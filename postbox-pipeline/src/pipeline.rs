use std::sync::Arc;

use postbox_common::{ClientId, ContactMessage, Reporter, tracing};
use postbox_delivery::DeliveryStrategy;
use postbox_notify::Notification;
use postbox_store::MessageStore;
use serde::{Deserialize, Serialize};

use crate::{
    admission::{AdmissionControl, Operation},
    error::SubmissionError,
};

/// Pipeline-level result of one submission, as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Durably stored and, when delivery ran inline, notified
    FullSuccess,
    /// Accepted, but either the notification or the durable write failed
    PartialSuccess,
    /// Nothing was accepted; the submission never reached persistence
    HardFailure,
}

impl std::fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::FullSuccess => "full-success",
            Self::PartialSuccess => "partial-success",
            Self::HardFailure => "hard-failure",
        })
    }
}

/// How delivery runs relative to the caller's response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// Await the delivery strategy before answering the caller
    #[default]
    Inline,
    /// Answer as soon as the message is stored; deliver on a detached task
    /// whose result the caller never sees
    Background,
}

/// Pipeline tunables.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub mode: DeliveryMode,
}

/// The submission pipeline.
///
/// Single-shot per submission: admission gate, structural validation, one
/// persistence attempt, one delivery-strategy invocation. No step is ever
/// revisited, and nothing after the admission gate rejects the submission.
#[derive(Debug)]
pub struct SubmissionPipeline {
    store: Arc<dyn MessageStore>,
    strategy: Arc<DeliveryStrategy>,
    admission: AdmissionControl,
    reporter: Arc<dyn Reporter>,
    mode: DeliveryMode,
}

impl SubmissionPipeline {
    #[must_use]
    pub fn new(
        store: Arc<dyn MessageStore>,
        strategy: Arc<DeliveryStrategy>,
        admission: AdmissionControl,
        reporter: Arc<dyn Reporter>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            strategy,
            admission,
            reporter,
            mode: config.mode,
        }
    }

    /// Run one submission through the pipeline.
    ///
    /// Storage and delivery failures are absorbed into the outcome: a
    /// submission that was stored but not notified still reads as accepted,
    /// and a submission that was notified but not stored is capped at
    /// [`DeliveryOutcome::PartialSuccess`] because the durability guarantee
    /// was not met.
    ///
    /// # Errors
    /// Only [`SubmissionError::AdmissionDenied`] and
    /// [`SubmissionError::Validation`]; both mean nothing was persisted and
    /// no transport was attempted.
    pub async fn submit(
        &self,
        message: ContactMessage,
        client: &ClientId,
    ) -> Result<DeliveryOutcome, SubmissionError> {
        // The admission gate runs before anything else; a denied submission
        // must leave no trace.
        if let Err(retry_after) = self.admission.check(client, Operation::Submission) {
            tracing::info!(
                client = %client,
                retry_after_secs = retry_after.as_secs(),
                "submission denied by admission control"
            );
            return Err(SubmissionError::AdmissionDenied { retry_after });
        }

        validate(&message)?;

        // One persistence attempt. A store failure downgrades the outcome
        // but never aborts the pipeline: the notification still carries the
        // message content to the operator, which is the best remaining copy.
        let persisted = match self.store.save(&message).await {
            Ok(record) => {
                tracing::info!(id = %record.id, "message persisted");
                true
            }
            Err(error) => {
                tracing::warn!(error = %error, "persistence failed, continuing to delivery");
                self.reporter
                    .report(&error.to_string(), "message persistence");
                false
            }
        };

        let notification = Notification::for_message(&message);
        let outcome = match self.mode {
            DeliveryMode::Background => {
                let strategy = Arc::clone(&self.strategy);
                // Detached on purpose: the caller's answer is "accepted and
                // stored"; the delivery result is unobservable to them. The
                // strategy reports its own failures to telemetry.
                tokio::spawn(async move {
                    let _ = strategy.deliver(&notification).await;
                });
                if persisted {
                    DeliveryOutcome::FullSuccess
                } else {
                    DeliveryOutcome::PartialSuccess
                }
            }
            DeliveryMode::Inline => {
                let delivered = self.strategy.deliver(&notification).await.is_ok();
                if persisted && delivered {
                    DeliveryOutcome::FullSuccess
                } else {
                    DeliveryOutcome::PartialSuccess
                }
            }
        };

        Ok(outcome)
    }
}

fn validate(message: &ContactMessage) -> Result<(), SubmissionError> {
    if message.name.trim().is_empty() {
        return Err(SubmissionError::Validation("name must not be empty"));
    }
    if message.sender_email.trim().is_empty() {
        return Err(SubmissionError::Validation(
            "sender email must not be empty",
        ));
    }
    if message.content.trim().is_empty() {
        return Err(SubmissionError::Validation("content must not be empty"));
    }
    Ok(())
}
