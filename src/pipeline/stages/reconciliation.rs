//! Duplicate reconciliation stage
//!
//! Groups surviving entries by identity and keeps one winner per group.
//! Winner selection, in order:
//!
//! 1. trusted beats untrusted
//! 2. lower source priority
//! 3. reachable IPv4 beats reachable IPv6-only beats unchecked
//! 4. first seen

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::models::{ClassifiedEntry, Verdict};

/// What makes two entries "the same channel"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    /// Canonical address
    #[default]
    Address,
    /// Canonical display name, case-insensitive
    DisplayName,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergePolicy {
    #[serde(default)]
    pub group_by: GroupBy,
}

impl MergePolicy {
    pub fn new(group_by: GroupBy) -> Self {
        Self { group_by }
    }

    /// Identity key of an entry under this policy
    pub fn identity_key(&self, entry: &ClassifiedEntry) -> String {
        match self.group_by {
            GroupBy::Address => entry.canonical_address.clone(),
            GroupBy::DisplayName => entry.display_name.to_lowercase(),
        }
    }
}

/// Survivors plus what was discarded on the way
#[derive(Debug, Clone, Default)]
pub struct ReconcileOutcome {
    /// One winner per identity, in first-seen order
    pub survivors: Vec<Verdict>,
    pub unreachable_dropped: usize,
    pub duplicates_dropped: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    policy: MergePolicy,
}

impl Reconciler {
    pub fn new(policy: MergePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &MergePolicy {
        &self.policy
    }

    pub fn reconcile(&self, verdicts: Vec<Verdict>) -> ReconcileOutcome {
        let mut outcome = ReconcileOutcome::default();
        let mut winners: Vec<Verdict> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        let mut verdicts = verdicts;
        verdicts.sort_by_key(|v| v.entry.sequence);

        for verdict in verdicts {
            if !verdict.reachable() {
                outcome.unreachable_dropped += 1;
                continue;
            }

            match index.entry(self.policy.identity_key(&verdict.entry)) {
                Entry::Vacant(slot) => {
                    slot.insert(winners.len());
                    winners.push(verdict);
                }
                Entry::Occupied(slot) => {
                    outcome.duplicates_dropped += 1;
                    let current = &mut winners[*slot.get()];
                    if rank(&verdict) < rank(current) {
                        *current = verdict;
                    }
                }
            }
        }

        winners.sort_by_key(|v| v.entry.sequence);
        outcome.survivors = winners;
        outcome
    }
}

/// Lower is better
fn rank(verdict: &Verdict) -> (bool, u8, u8, usize) {
    (
        !verdict.entry.is_trusted(),
        verdict.entry.source_priority(),
        verdict.liveness.preference(),
        verdict.entry.sequence,
    )
}
