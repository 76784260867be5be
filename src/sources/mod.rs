//! Upstream source handlers
//!
//! Every configured source is fetched concurrently. A source that fails to
//! fetch or parse contributes zero entries; the run continues with the rest.

pub mod factory;
pub mod json_api;
pub mod m3u;
pub mod plain;
pub mod traits;

pub use factory::SourceHandlerFactory;
pub use traits::SourceHandler;

use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::models::RawEntry;
use crate::utils::human_format::format_duration_precise;

/// Ingest all sources, concatenating their entries in declaration order
pub async fn ingest_all(handlers: &[Arc<dyn SourceHandler>]) -> Vec<RawEntry> {
    let started = Instant::now();
    let results = join_all(handlers.iter().map(|h| h.ingest_entries())).await;

    let mut entries = Vec::new();
    let mut failed = 0;
    for (handler, result) in handlers.iter().zip(results) {
        let source = handler.source();
        match result {
            Ok(mut batch) => {
                info!(
                    "Source '{}' ({}) contributed {} entries",
                    source.name,
                    source.format,
                    batch.len()
                );
                entries.append(&mut batch);
            }
            Err(e) => {
                failed += 1;
                warn!("Source '{}' ({}) failed: {}", source.name, source.format, e);
            }
        }
    }

    info!(
        "Ingestion completed: duration={} sources={} failed={} entries={}",
        format_duration_precise(started.elapsed()),
        handlers.len(),
        failed,
        entries.len()
    );
    entries
}
