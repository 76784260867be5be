//! Reconciliation pipeline orchestrator
//!
//! Runs raw entries from every source through the stages in order and
//! returns the sequenced playlist entries together with run statistics.
//! Malformed input never aborts a run; it only shows up in the counters.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::config::Config;
use crate::models::{ClassifiedEntry, PlaylistEntry, RawEntry};
use crate::services::LivenessProbe;
use crate::taxonomy::{ClassifierTables, FilterTables};
use crate::utils::human_format::format_duration_precise;
use crate::utils::url::UrlUtils;

use super::stages::{
    AddressNormalizer, Classifier, ForeignFilter, ProbeSummary, ProbingStage, Reconciler,
    Sequencer,
};

/// Counters collected across one pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub raw_entries: usize,
    pub invalid_addresses: usize,
    pub foreign_dropped: usize,
    pub liveness: ProbeSummary,
    pub unreachable_dropped: usize,
    pub duplicates_dropped: usize,
    pub emitted: usize,
}

#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    pub entries: Vec<PlaylistEntry>,
    pub stats: PipelineStats,
}

pub struct ReconcilePipeline {
    normalizer: AddressNormalizer,
    classifier: Classifier,
    filter: ForeignFilter,
    probing: ProbingStage,
    reconciler: Reconciler,
    sequencer: Sequencer,
}

impl ReconcilePipeline {
    pub fn new(
        normalizer: AddressNormalizer,
        classifier: Classifier,
        filter: ForeignFilter,
        probing: ProbingStage,
        reconciler: Reconciler,
        sequencer: Sequencer,
    ) -> Self {
        Self {
            normalizer,
            classifier,
            filter,
            probing,
            reconciler,
            sequencer,
        }
    }

    /// Build the pipeline from configuration with built-in tables
    pub fn from_config(config: &Config, prober: Arc<dyn LivenessProbe>) -> Self {
        let filter_tables = FilterTables::builtin()
            .with_allowed(&config.filter.extra_allowed)
            .with_denied(&config.filter.extra_denied);
        let classifier_tables = Arc::new(ClassifierTables::builtin());

        Self::new(
            AddressNormalizer::new().with_extra_params(&config.normalizer.extra_volatile_params),
            Classifier::new(classifier_tables.clone()),
            ForeignFilter::new(Arc::new(filter_tables)),
            ProbingStage::new(prober, config.probe.concurrency, config.probe.enabled),
            Reconciler::new(config.reconcile.clone()),
            Sequencer::new(config.sequence.clone(), classifier_tables),
        )
    }

    pub async fn run(&self, raw: Vec<RawEntry>) -> PipelineOutput {
        let run_start = Instant::now();
        let mut stats = PipelineStats {
            raw_entries: raw.len(),
            ..PipelineStats::default()
        };
        info!("Starting reconciliation pipeline with {} raw entries", raw.len());

        let classified = self.classify(raw, &mut stats);
        let kept = self.filter_foreign(classified, &mut stats);

        let (verdicts, summary) = self.probing.process(kept, self.reconciler.policy()).await;
        stats.liveness = summary;

        let stage_start = Instant::now();
        let outcome = self.reconciler.reconcile(verdicts);
        stats.unreachable_dropped = outcome.unreachable_dropped;
        stats.duplicates_dropped = outcome.duplicates_dropped;
        info!(
            "Reconciliation stage completed: duration={} survivors={} duplicates_dropped={} unreachable_dropped={}",
            format_duration_precise(stage_start.elapsed()),
            outcome.survivors.len(),
            outcome.duplicates_dropped,
            outcome.unreachable_dropped
        );

        let stage_start = Instant::now();
        let entries = self
            .sequencer
            .sequence(outcome.survivors.into_iter().map(PlaylistEntry::from).collect());
        stats.emitted = entries.len();
        info!(
            "Sequencing stage completed: duration={} entries={}",
            format_duration_precise(stage_start.elapsed()),
            entries.len()
        );

        info!(
            "Reconciliation pipeline completed in {}: {} raw entries -> {} emitted",
            format_duration_precise(run_start.elapsed()),
            stats.raw_entries,
            stats.emitted
        );
        PipelineOutput { entries, stats }
    }

    fn classify(&self, raw: Vec<RawEntry>, stats: &mut PipelineStats) -> Vec<ClassifiedEntry> {
        let stage_start = Instant::now();
        let mut classified = Vec::with_capacity(raw.len());

        for (sequence, entry) in raw.into_iter().enumerate() {
            if let Err(e) = self.normalizer.validate(&entry.address) {
                debug!(
                    "Dropping '{}' from {}: {}",
                    entry.name,
                    entry.source,
                    UrlUtils::obfuscate_credentials(&e.to_string())
                );
                stats.invalid_addresses += 1;
                continue;
            }
            let canonical_address = self.normalizer.normalize(&entry.address);
            classified.push(self.classifier.classify_entry(entry, canonical_address, sequence));
        }

        info!(
            "Classification stage completed: duration={} classified={} invalid_addresses={}",
            format_duration_precise(stage_start.elapsed()),
            classified.len(),
            stats.invalid_addresses
        );
        classified
    }

    fn filter_foreign(
        &self,
        entries: Vec<ClassifiedEntry>,
        stats: &mut PipelineStats,
    ) -> Vec<ClassifiedEntry> {
        let stage_start = Instant::now();
        let before = entries.len();
        let kept: Vec<ClassifiedEntry> = entries
            .into_iter()
            .filter(|e| {
                let disallowed = self.filter.is_disallowed(&e.raw.name);
                if disallowed {
                    debug!("Filtered foreign channel '{}'", e.raw.name);
                }
                !disallowed
            })
            .collect();
        stats.foreign_dropped = before - kept.len();

        info!(
            "Filtering stage completed: duration={} kept={} foreign_dropped={}",
            format_duration_precise(stage_start.elapsed()),
            kept.len(),
            stats.foreign_dropped
        );
        kept
    }
}
