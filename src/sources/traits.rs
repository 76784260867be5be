//! Source handler trait definitions
//!
//! A source handler fetches one configured upstream and turns its payload
//! into raw entries. Handlers never dedupe or classify; that is the
//! pipeline's job.

use async_trait::async_trait;

use crate::config::{SourceConfig, SourceFormat};
use crate::errors::SourceResult;
use crate::models::RawEntry;

#[async_trait]
pub trait SourceHandler: Send + Sync {
    /// Configuration this handler was built from
    fn source(&self) -> &SourceConfig;

    fn format(&self) -> SourceFormat {
        self.source().format
    }

    /// Fetch and parse the source
    async fn ingest_entries(&self) -> SourceResult<Vec<RawEntry>>;
}

/// Raw entry carrying the priority, trust and category pin of `source`
pub(crate) fn entry_for(source: &SourceConfig, name: &str, address: &str) -> RawEntry {
    RawEntry::new(name.trim(), address.trim(), source.priority, source.trusted)
        .with_source(source.name.as_str())
        .with_category_override(source.category)
}
