//! Channel reconciliation pipeline
//!
//! - **Stages**: normalization, classification, filtering, liveness,
//!   reconciliation and sequencing
//! - **Orchestrator**: runs the stages in order and collects statistics

pub mod orchestrator;
pub mod stages;

pub use orchestrator::{PipelineOutput, PipelineStats, ReconcilePipeline};
