//! Output sequencing stage
//!
//! Orders the reconciled entries. The sort key is
//! `(tier, category rank, tertiary, display name, address)` where tier is the
//! source priority when tiered sequencing is on, and tertiary is the numeric
//! ordinal for national channels and the display name otherwise. The trailing
//! category is then moved to the end with a stable partition.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;

use crate::config::defaults::DEFAULT_TIERED_SEQUENCING;
use crate::models::PlaylistEntry;
use crate::taxonomy::{Category, ClassifierTables, Theme};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencePolicy {
    /// Emit all priority-0 entries before any priority-1 entry
    #[serde(default = "default_tiered")]
    pub tiered: bool,
    /// Category forced to the end of the playlist
    #[serde(default = "default_trailing_category")]
    pub trailing_category: Option<Category>,
}

fn default_tiered() -> bool {
    DEFAULT_TIERED_SEQUENCING
}

fn default_trailing_category() -> Option<Category> {
    Some(Category::Theme(Theme::Event))
}

impl Default for SequencePolicy {
    fn default() -> Self {
        Self {
            tiered: default_tiered(),
            trailing_category: default_trailing_category(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Sequencer {
    policy: SequencePolicy,
    tables: Arc<ClassifierTables>,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new(SequencePolicy::default(), Arc::new(ClassifierTables::builtin()))
    }
}

impl Sequencer {
    pub fn new(policy: SequencePolicy, tables: Arc<ClassifierTables>) -> Self {
        Self { policy, tables }
    }

    /// Total order over playlist entries
    pub fn compare(&self, a: &PlaylistEntry, b: &PlaylistEntry) -> Ordering {
        self.tier(a)
            .cmp(&self.tier(b))
            .then_with(|| a.category.rank().cmp(&b.category.rank()))
            .then_with(|| self.tertiary(a, b))
            .then_with(|| a.display_name.cmp(&b.display_name))
            .then_with(|| a.address.cmp(&b.address))
    }

    pub fn sequence(&self, mut entries: Vec<PlaylistEntry>) -> Vec<PlaylistEntry> {
        entries.sort_by(|a, b| self.compare(a, b));

        let Some(trailing) = self.policy.trailing_category else {
            return entries;
        };
        let (mut head, tail): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(|e| e.category != trailing);
        head.extend(tail);
        head
    }

    fn tier(&self, entry: &PlaylistEntry) -> u8 {
        if self.policy.tiered {
            entry.source_priority
        } else {
            0
        }
    }

    fn tertiary(&self, a: &PlaylistEntry, b: &PlaylistEntry) -> Ordering {
        if a.category != Category::NationalNetwork || b.category != Category::NationalNetwork {
            return a.display_name.cmp(&b.display_name);
        }
        // Names without a known ordinal sort after every numbered channel
        let national = &self.tables.national;
        match (
            national.known_ordinal_in(&a.display_name),
            national.known_ordinal_in(&b.display_name),
        ) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}
