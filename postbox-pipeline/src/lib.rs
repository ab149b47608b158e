//! Submission pipeline: admission gate, durable write, then notification.
//!
//! A submission is accepted as soon as it is durably stored; the email
//! notification is best-effort on top of that. The pipeline absorbs store
//! and transport failures into a single caller-visible outcome and only
//! rejects outright for malformed input or a client over its admission
//! window.

pub mod admission;
mod error;
mod pipeline;

pub use admission::{AdmissionConfig, AdmissionControl, Operation};
pub use error::SubmissionError;
pub use pipeline::{DeliveryMode, DeliveryOutcome, PipelineConfig, SubmissionPipeline};
