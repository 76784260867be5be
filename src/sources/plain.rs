//! Plain `name,address` list source handler

use async_trait::async_trait;
use tracing::{debug, info};

use super::traits::{SourceHandler, entry_for};
use crate::config::SourceConfig;
use crate::errors::SourceResult;
use crate::models::RawEntry;
use crate::utils::StandardHttpClient;
use crate::utils::url::UrlUtils;

pub struct PlainListHandler {
    source: SourceConfig,
    client: StandardHttpClient,
}

impl PlainListHandler {
    pub fn new(source: SourceConfig, client: StandardHttpClient) -> Self {
        Self { source, client }
    }
}

#[async_trait]
impl SourceHandler for PlainListHandler {
    fn source(&self) -> &SourceConfig {
        &self.source
    }

    async fn ingest_entries(&self) -> SourceResult<Vec<RawEntry>> {
        let url = UrlUtils::resolve_source_url(&self.source.url);
        let content = self
            .client
            .fetch_text(&self.source.name, &url, &self.source.headers, &self.source.query)
            .await?;

        let entries = parse_plain_list(&content, &self.source);
        info!(
            "Parsed {} entries from plain list source: {}",
            entries.len(),
            self.source.name
        );
        Ok(entries)
    }
}

/// Parse a plain channel list.
///
/// One `name,address` per line, split at the first comma. Blank lines,
/// comments, section headings such as `央视,#genre#` and lines starting with
/// a configured skip prefix are ignored, as are addresses that are not
/// http(s).
pub fn parse_plain_list(content: &str, source: &SourceConfig) -> Vec<RawEntry> {
    let mut entries = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if source
            .skip_prefixes
            .iter()
            .any(|prefix| !prefix.is_empty() && line.starts_with(prefix.as_str()))
        {
            continue;
        }

        let Some((name, address)) = line.split_once(',') else {
            continue;
        };
        let (name, address) = (name.trim(), address.trim());
        if name.is_empty() || address.is_empty() {
            continue;
        }
        if !UrlUtils::is_http(address) {
            debug!(
                "Skipping non-http address at line {} of '{}': {}",
                line_num + 1,
                source.name,
                address
            );
            continue;
        }

        entries.push(entry_for(source, name, address));
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceFormat;
    use crate::taxonomy::Category;

    fn source() -> SourceConfig {
        SourceConfig::new("haiyan", "https://lists.example/haiyan.txt", SourceFormat::Plain)
    }

    #[test]
    fn test_parse_plain_list() {
        let content = "\
更新时间,#genre#
2024-05-01,http://a.example/update.mp4

央视频道,#genre#
CCTV-1,http://a.example/cctv1.m3u8
# a comment
湖南卫视 , http://b.example/hunan.m3u8?token=1
no comma here
TV,http://c.example/skipped.m3u8
凤凰中文,rtmp://c.example/phoenix
";
        let entries = parse_plain_list(content, &source());
        let pairs: Vec<_> = entries
            .iter()
            .map(|e| (e.name.as_str(), e.address.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("2024-05-01", "http://a.example/update.mp4"),
                ("CCTV-1", "http://a.example/cctv1.m3u8"),
                ("湖南卫视", "http://b.example/hunan.m3u8?token=1"),
            ]
        );
        assert!(entries.iter().all(|e| e.source == "haiyan"));
    }

    #[test]
    fn test_splits_at_first_comma() {
        let entries = parse_plain_list("Name,http://a.example/x?a=1,2", &source());
        assert_eq!(entries[0].address, "http://a.example/x?a=1,2");
    }

    #[test]
    fn test_source_settings_are_carried() {
        let mut source = source();
        source.priority = 0;
        source.trusted = true;
        source.category = Some(Category::Local);
        let entries = parse_plain_list("西充综合,http://a.example/xc.m3u8", &source);
        assert_eq!(entries[0].source_priority, 0);
        assert!(entries[0].trusted);
        assert_eq!(entries[0].category_override, Some(Category::Local));
    }
}
