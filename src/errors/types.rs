//! Error type definitions for the channel reconciler
//!
//! The hierarchy mirrors the recovery rules of the pipeline: source errors
//! degrade completeness, address errors drop one candidate, probe errors turn
//! into an unreachable verdict and only application errors stop a run.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Source handling errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The final playlist could not be written
    #[error("Failed to write output {path:?}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Source handling specific errors
#[derive(Error, Debug)]
pub enum SourceError {
    /// Network failure while talking to the upstream
    #[error("Fetch failed for {source_name}: {message}")]
    Fetch { source_name: String, message: String },

    /// Upstream answered with a non-success status
    #[error("HTTP error: {status} - {url}")]
    Http { status: u16, url: String },

    /// Parsing errors for source data
    #[error("Parse error: {source_type} - {message}")]
    ParseError { source_type: String, message: String },

    /// Invalid source configuration
    #[error("Invalid configuration: {field} - {message}")]
    InvalidConfig { field: String, message: String },
}

/// A stream address that cannot be used as a channel address
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressParseError {
    /// Not an absolute URL
    #[error("Malformed address '{address}': {reason}")]
    Malformed { address: String, reason: String },

    /// Parsed, but not something a player can fetch
    #[error("Unsupported scheme '{scheme}' in address '{address}'")]
    UnsupportedScheme { address: String, scheme: String },

    /// URL without a host component
    #[error("Address '{address}' has no host")]
    MissingHost { address: String },
}

/// Liveness probe failures; every variant is an "unreachable" verdict
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// Host name did not resolve
    #[error("DNS resolution failed for {host}: {message}")]
    Dns { host: String, message: String },

    /// Host resolved, but only to IPv6 addresses while IPv4 is required
    #[error("No IPv4 address for {host}")]
    NoIpv4 { host: String },

    /// Probe exceeded its time budget
    #[error("Probe timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    /// Connection refused, TLS failure and similar transport errors
    #[error("Request failed: {message}")]
    Request { message: String },

    /// Server answered outside of [200, 400)
    #[error("Unexpected status {status}")]
    Status { status: u16 },

    /// Address could not be probed at all
    #[error("Invalid address: {0}")]
    Address(#[from] AddressParseError),
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an output error for the given artifact path
    pub fn output<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::Output {
            path: path.into(),
            source,
        }
    }
}

impl SourceError {
    /// Create a fetch error for a named source
    pub fn fetch<N: Into<String>, M: Into<String>>(source_name: N, message: M) -> Self {
        Self::Fetch {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create a parse error for a source format
    pub fn parse<T: Into<String>, M: Into<String>>(source_type: T, message: M) -> Self {
        Self::ParseError {
            source_type: source_type.into(),
            message: message.into(),
        }
    }
}

impl ProbeError {
    /// Create a transport error from any displayable failure
    pub fn request<E: std::fmt::Display>(error: E) -> Self {
        Self::Request {
            message: error.to_string(),
        }
    }

    /// Short machine-friendly tag used in logs and statistics
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeError::Dns { .. } => "dns",
            ProbeError::NoIpv4 { .. } => "no_ipv4",
            ProbeError::Timeout { .. } => "timeout",
            ProbeError::Request { .. } => "request",
            ProbeError::Status { .. } => "status",
            ProbeError::Address(_) => "address",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AppError::configuration("missing [[sources]]");
        assert_eq!(err.to_string(), "Configuration error: missing [[sources]]");

        let err = SourceError::fetch("whitelist", "connection reset");
        assert_eq!(
            err.to_string(),
            "Fetch failed for whitelist: connection reset"
        );

        let err = ProbeError::Status { status: 500 };
        assert_eq!(err.to_string(), "Unexpected status 500");
        assert_eq!(err.kind(), "status");
    }

    #[test]
    fn test_source_error_converts_into_app_error() {
        let app: AppError = SourceError::parse("m3u", "missing comma").into();
        assert!(matches!(app, AppError::Source(SourceError::ParseError { .. })));
    }

    #[test]
    fn test_output_error_keeps_path() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = AppError::output("/live/current.m3u8", io);
        assert!(err.to_string().contains("/live/current.m3u8"));
    }
}
