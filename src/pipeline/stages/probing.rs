//! Liveness stage
//!
//! Attaches a [`Liveness`] to every classified entry. Trusted entries are
//! never probed. Untrusted entries whose identity already has a trusted
//! member would lose reconciliation regardless of the outcome, so they are
//! left unchecked. Everything else is probed through a bounded pool.

use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::models::{ClassifiedEntry, Liveness, Verdict};
use crate::services::LivenessProbe;
use crate::utils::human_format::format_duration_precise;

use super::reconciliation::MergePolicy;

/// Counters reported by one liveness pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeSummary {
    pub trusted: usize,
    pub skipped: usize,
    pub probed: usize,
    pub reachable: usize,
    pub unreachable: usize,
}

pub struct ProbingStage {
    prober: Arc<dyn LivenessProbe>,
    concurrency: usize,
    enabled: bool,
}

impl ProbingStage {
    pub fn new(prober: Arc<dyn LivenessProbe>, concurrency: usize, enabled: bool) -> Self {
        Self {
            prober,
            concurrency: concurrency.max(1),
            enabled,
        }
    }

    /// Attach verdicts, preserving the input order
    pub async fn process(
        &self,
        entries: Vec<ClassifiedEntry>,
        policy: &MergePolicy,
    ) -> (Vec<Verdict>, ProbeSummary) {
        let stage_start = Instant::now();
        let mut summary = ProbeSummary::default();

        let trusted_keys: HashSet<String> = entries
            .iter()
            .filter(|e| e.is_trusted())
            .map(|e| policy.identity_key(e))
            .collect();

        let mut verdicts = Vec::with_capacity(entries.len());
        let mut candidates = Vec::new();
        for entry in entries {
            if entry.is_trusted() {
                summary.trusted += 1;
                verdicts.push(Verdict::new(entry, Liveness::Trusted));
            } else if !self.enabled || trusted_keys.contains(&policy.identity_key(&entry)) {
                summary.skipped += 1;
                verdicts.push(Verdict::new(entry, Liveness::Unchecked));
            } else {
                candidates.push(entry);
            }
        }

        summary.probed = candidates.len();
        let probed: Vec<Verdict> = stream::iter(candidates)
            .map(|entry| {
                let prober = Arc::clone(&self.prober);
                async move {
                    let liveness = match prober.probe(entry.address()).await {
                        Ok(family) => Liveness::Reachable { family },
                        Err(e) => Liveness::Unreachable {
                            reason: e.to_string(),
                        },
                    };
                    Verdict::new(entry, liveness)
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        for verdict in &probed {
            if verdict.reachable() {
                summary.reachable += 1;
            } else {
                summary.unreachable += 1;
            }
        }
        verdicts.extend(probed);
        verdicts.sort_by_key(|v| v.entry.sequence);

        info!(
            "Liveness stage completed: duration={} trusted={} skipped={} probed={} reachable={} unreachable={} concurrency={}",
            format_duration_precise(stage_start.elapsed()),
            summary.trusted,
            summary.skipped,
            summary.probed,
            summary.reachable,
            summary.unreachable,
            self.concurrency
        );

        (verdicts, summary)
    }
}
