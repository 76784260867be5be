//! M3U playlist source handler

use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::traits::{SourceHandler, entry_for};
use crate::config::SourceConfig;
use crate::errors::SourceResult;
use crate::models::RawEntry;
use crate::utils::StandardHttpClient;
use crate::utils::url::UrlUtils;

pub struct M3uSourceHandler {
    source: SourceConfig,
    client: StandardHttpClient,
}

impl M3uSourceHandler {
    pub fn new(source: SourceConfig, client: StandardHttpClient) -> Self {
        Self { source, client }
    }
}

#[async_trait]
impl SourceHandler for M3uSourceHandler {
    fn source(&self) -> &SourceConfig {
        &self.source
    }

    async fn ingest_entries(&self) -> SourceResult<Vec<RawEntry>> {
        let url = UrlUtils::resolve_source_url(&self.source.url);
        let content = self
            .client
            .fetch_text(&self.source.name, &url, &self.source.headers, &self.source.query)
            .await?;

        let entries = parse_m3u_content(&content, &self.source);
        info!(
            "Parsed {} entries from M3U source: {}",
            entries.len(),
            self.source.name
        );
        Ok(entries)
    }
}

/// Metadata of one `#EXTINF` line waiting for its address
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingEntry {
    name: String,
    group_title: Option<String>,
}

/// Parse M3U content into raw entries.
///
/// Each `#EXTINF` line is paired with the next address line. Addresses
/// without metadata and non-http addresses are skipped.
pub fn parse_m3u_content(content: &str, source: &SourceConfig) -> Vec<RawEntry> {
    let mut entries = Vec::new();
    let mut pending: Option<PendingEntry> = None;

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with("#EXTINF") {
            pending = parse_extinf_line(line);
            if pending.is_none() {
                debug!(
                    "Unusable EXTINF at line {} of '{}': {}",
                    line_num + 1,
                    source.name,
                    line
                );
            }
            continue;
        }
        if line.starts_with('#') {
            continue;
        }

        let Some(meta) = pending.take() else {
            warn!(
                "Found stream URL without EXTINF metadata at line {} of '{}'",
                line_num + 1,
                source.name
            );
            continue;
        };
        if !UrlUtils::is_http(line) {
            debug!(
                "Skipping non-http address at line {} of '{}'",
                line_num + 1,
                source.name
            );
            continue;
        }

        let mut entry = entry_for(source, &meta.name, line);
        if let Some(group) = meta.group_title {
            entry = entry.with_group_hint(group);
        }
        entries.push(entry);
    }

    entries
}

/// Parse `#EXTINF:-1 tvg-name="..." group-title="...",Title`.
///
/// `tvg-name` wins over the title; `None` when neither carries a name.
fn parse_extinf_line(line: &str) -> Option<PendingEntry> {
    let content = line.strip_prefix("#EXTINF:").unwrap_or(line);
    let (attrs_part, title) = match split_title(content) {
        Some(pos) => (&content[..pos], content[pos + 1..].trim()),
        None => (content, ""),
    };

    let mut attributes = parse_extinf_attributes(attrs_part);
    let name = attributes
        .remove("tvg-name")
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| title.to_string());
    if name.is_empty() {
        return None;
    }

    Some(PendingEntry {
        name,
        group_title: attributes.remove("group-title"),
    })
}

/// Byte offset of the last comma outside double quotes
fn split_title(content: &str) -> Option<usize> {
    let mut in_quotes = false;
    let mut last = None;
    for (pos, ch) in content.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => last = Some(pos),
            _ => {}
        }
    }
    last
}

/// Parse `key="value"` attributes; unquoted values end at whitespace
fn parse_extinf_attributes(attrs_part: &str) -> HashMap<String, String> {
    let mut attributes = HashMap::new();

    let mut chars = attrs_part.chars().peekable();
    let mut current_key = String::new();
    let mut current_value = String::new();
    let mut in_quotes = false;
    let mut in_key = false;
    let mut in_value = false;

    while let Some(ch) = chars.next() {
        match ch {
            ' ' | '\t' if !in_quotes => {
                if in_value && !current_key.is_empty() && !current_value.is_empty() {
                    attributes.insert(current_key.to_lowercase(), current_value.clone());
                }
                current_key.clear();
                current_value.clear();
                in_key = true;
                in_value = false;
            }
            '=' if !in_quotes => {
                in_key = false;
                in_value = true;
                if chars.peek() == Some(&'"') {
                    chars.next();
                    in_quotes = true;
                }
            }
            '"' if in_value => {
                in_quotes = false;
                if !current_key.is_empty() {
                    attributes.insert(current_key.to_lowercase(), current_value.clone());
                }
                current_key.clear();
                current_value.clear();
                in_value = false;
            }
            _ => {
                if in_key {
                    current_key.push(ch);
                } else if in_value {
                    current_value.push(ch);
                }
            }
        }
    }

    if in_value && !current_key.is_empty() && !current_value.is_empty() {
        attributes.insert(current_key.to_lowercase(), current_value);
    }

    attributes
}
