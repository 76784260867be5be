//! Centralized error handling for the channel reconciler
//!
//! Nothing inside the reconciliation core is fatal. Each error category maps
//! to a recovery rule applied by the stage that observes it:
//!
//! - **Source Errors**: an upstream list could not be fetched or decoded; the
//!   source contributes zero entries.
//! - **Address Parse Errors**: a single candidate carries an unusable address;
//!   the candidate is dropped.
//! - **Probe Errors**: a liveness probe failed; the verdict is "unreachable".
//! - **Application Errors**: configuration problems and the failure to write
//!   the output artifact, which aborts the run.
//!
//! # Usage
//!
//! ```rust
//! use channel_reconciler::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Err(AppError::configuration("no sources configured"))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Source Results
pub type SourceResult<T> = Result<T, SourceError>;

/// Convenience type alias for liveness probe Results
pub type ProbeResult<T> = Result<T, ProbeError>;
