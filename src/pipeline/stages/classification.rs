//! Channel classification stage
//!
//! Assigns every entry a category and a canonical display name. Evaluation
//! order is fixed: national aliases, provincial network keywords, thematic
//! rules, geography, and finally `Other`.

use std::sync::Arc;

use crate::models::{ClassifiedEntry, RawEntry};
use crate::taxonomy::tables::contains_any;
use crate::taxonomy::{Category, ClassifierTables};

/// Category plus canonical display name for one channel name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: Category,
    pub display_name: String,
}

impl Classification {
    fn new(category: Category, display_name: impl Into<String>) -> Self {
        Self {
            category,
            display_name: display_name.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Classifier {
    tables: Arc<ClassifierTables>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(Arc::new(ClassifierTables::builtin()))
    }
}

impl Classifier {
    pub fn new(tables: Arc<ClassifierTables>) -> Self {
        Self { tables }
    }

    /// Classify a channel name. Total: unknown names land in `Other` with
    /// their trimmed name as display name.
    pub fn classify(&self, name: &str) -> Classification {
        let trimmed = name.trim();
        let lowered = trimmed.to_lowercase();

        if let Some(hit) = self.tables.national.lookup(&lowered) {
            let display_name = match hit.ordinal {
                Some(ordinal) => self.tables.national.canonical_name(ordinal),
                None => trimmed.to_string(),
            };
            return Classification::new(Category::NationalNetwork, display_name);
        }

        if contains_any(&lowered, &self.tables.provincial_network_keywords) {
            return Classification::new(Category::ProvincialNetwork, trimmed);
        }

        if let Some(rule) = self.tables.thematic.iter().find(|r| r.matches(&lowered)) {
            return Classification::new(Category::Theme(rule.theme), trimmed);
        }

        if let Some(rule) = self
            .tables
            .geography
            .iter()
            .find(|r| contains_any(&lowered, &r.keywords))
        {
            return Classification::new(Category::Province(rule.province), trimmed);
        }

        Classification::new(Category::Other, trimmed)
    }

    /// Classify a raw entry, honouring the source's category override and
    /// falling back to the M3U group title when the name says nothing.
    pub fn classify_entry(
        &self,
        raw: RawEntry,
        canonical_address: String,
        sequence: usize,
    ) -> ClassifiedEntry {
        let Classification {
            mut category,
            display_name,
        } = self.classify(&raw.name);

        if let Some(pinned) = raw.category_override {
            category = pinned;
        } else if category == Category::Other
            && let Some(hint) = raw.group_hint.as_deref()
        {
            category = self.classify(hint).category;
        }

        ClassifiedEntry {
            raw,
            category,
            display_name,
            canonical_address,
            sequence,
        }
    }
}
