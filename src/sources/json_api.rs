//! JSON API source handler
//!
//! Some channels are only published through an API returning a short-lived
//! stream address. The handler issues one GET with the configured query and
//! headers and reads the address at a JSON pointer.

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use super::traits::{SourceHandler, entry_for};
use crate::config::SourceConfig;
use crate::errors::{SourceError, SourceResult};
use crate::models::RawEntry;
use crate::utils::StandardHttpClient;
use crate::utils::url::UrlUtils;

pub struct JsonApiHandler {
    source: SourceConfig,
    client: StandardHttpClient,
}

impl JsonApiHandler {
    pub fn new(source: SourceConfig, client: StandardHttpClient) -> Self {
        Self { source, client }
    }
}

#[async_trait]
impl SourceHandler for JsonApiHandler {
    fn source(&self) -> &SourceConfig {
        &self.source
    }

    async fn ingest_entries(&self) -> SourceResult<Vec<RawEntry>> {
        let url = UrlUtils::resolve_source_url(&self.source.url);
        let body = self
            .client
            .fetch_text(&self.source.name, &url, &self.source.headers, &self.source.query)
            .await?;

        let entry = parse_api_response(&body, &self.source)?;
        info!(
            "Resolved stream address for '{}' from API source: {}",
            entry.name, self.source.name
        );
        Ok(vec![entry])
    }
}

/// Extract the single entry of a JSON API response
pub fn parse_api_response(body: &str, source: &SourceConfig) -> SourceResult<RawEntry> {
    let document: Value = serde_json::from_str(body)
        .map_err(|e| SourceError::parse("json_api", format!("invalid JSON: {e}")))?;
    let address = extract_stream_address(&document, source.json_pointer())?;

    let name = source
        .channel_name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| SourceError::InvalidConfig {
            field: "channel_name".to_string(),
            message: format!("json_api source '{}' has no channel name", source.name),
        })?;

    Ok(entry_for(source, name, &address))
}

/// Read an http(s) address at `pointer`
pub fn extract_stream_address(document: &Value, pointer: &str) -> SourceResult<String> {
    let address = document
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or_else(|| SourceError::parse("json_api", format!("no string at {pointer}")))?;

    if !UrlUtils::is_http(address) {
        return Err(SourceError::parse(
            "json_api",
            format!("value at {pointer} is not an http address"),
        ));
    }
    Ok(address.to_string())
}
