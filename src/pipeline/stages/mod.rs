//! Reconciliation pipeline stages
//!
//! Stages run in a fixed order: normalization and classification, foreign
//! filtering, liveness probing, reconciliation, sequencing.

pub mod classification;
pub mod filtering;
pub mod normalization;
pub mod probing;
pub mod reconciliation;
pub mod sequencing;

pub use classification::{Classification, Classifier};
pub use filtering::ForeignFilter;
pub use normalization::AddressNormalizer;
pub use probing::{ProbeSummary, ProbingStage};
pub use reconciliation::{GroupBy, MergePolicy, ReconcileOutcome, Reconciler};
pub use sequencing::{SequencePolicy, Sequencer};
