//! Utility modules for the channel reconciler
//!
//! This module contains reusable utilities that can be used
//! across different parts of the system.

pub mod http_client;
pub mod human_format;
pub mod url;

pub use http_client::StandardHttpClient;
