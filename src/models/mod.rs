//! Entry models flowing through the reconciliation pipeline
//!
//! `RawEntry` → `ClassifiedEntry` → `Verdict` → `PlaylistEntry`. Each stage
//! wraps the previous value instead of mutating it; raw entries are never
//! changed after a source adapter produced them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::taxonomy::Category;

/// One `name,address` record produced by a source adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    pub name: String,
    pub address: String,
    /// Lower is emitted earlier and wins ties
    pub source_priority: u8,
    /// Trusted entries are never probed
    pub trusted: bool,
    /// Name of the source that produced this entry
    pub source: String,
    /// `group-title` carried by M3U sources
    pub group_hint: Option<String>,
    /// Category pinned by the source configuration
    pub category_override: Option<Category>,
}

impl RawEntry {
    pub fn new<N: Into<String>, A: Into<String>>(
        name: N,
        address: A,
        source_priority: u8,
        trusted: bool,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            source_priority,
            trusted,
            source: String::new(),
            group_hint: None,
            category_override: None,
        }
    }

    pub fn with_source<S: Into<String>>(mut self, source: S) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_group_hint<S: Into<String>>(mut self, group: S) -> Self {
        let group = group.into();
        self.group_hint = if group.trim().is_empty() {
            None
        } else {
            Some(group)
        };
        self
    }

    pub fn with_category_override(mut self, category: Option<Category>) -> Self {
        self.category_override = category;
        self
    }
}

/// A raw entry after classification and address canonicalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedEntry {
    pub raw: RawEntry,
    pub category: Category,
    /// Canonical display name, e.g. `CCTV-1` for `中央一套`
    pub display_name: String,
    /// Dedup key derived from `raw.address`
    pub canonical_address: String,
    /// First-seen position across the whole run
    pub sequence: usize,
}

impl ClassifiedEntry {
    pub fn is_trusted(&self) -> bool {
        self.raw.trusted
    }

    pub fn source_priority(&self) -> u8 {
        self.raw.source_priority
    }

    pub fn address(&self) -> &str {
        &self.raw.address
    }
}

/// Address family a host resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressFamily {
    Ipv4,
    /// Resolved, but to IPv6 addresses only
    Ipv6Only,
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::Ipv4 => write!(f, "ipv4"),
            AddressFamily::Ipv6Only => write!(f, "ipv6"),
        }
    }
}

/// Outcome of the liveness stage for one entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Liveness {
    /// Trusted source, reachable by construction
    Trusted,
    Reachable { family: AddressFamily },
    Unreachable { reason: String },
    /// Not probed: probing disabled, or the entry is outranked by a trusted one
    Unchecked,
}

impl Liveness {
    pub fn is_reachable(&self) -> bool {
        !matches!(self, Liveness::Unreachable { .. })
    }

    /// Reconciliation preference, lower is better:
    /// reachable IPv4, then reachable IPv6-only, then everything else.
    pub fn preference(&self) -> u8 {
        match self {
            Liveness::Reachable {
                family: AddressFamily::Ipv4,
            } => 0,
            Liveness::Reachable {
                family: AddressFamily::Ipv6Only,
            } => 1,
            Liveness::Trusted | Liveness::Unchecked | Liveness::Unreachable { .. } => 2,
        }
    }
}

/// A classified entry annotated with its liveness outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub entry: ClassifiedEntry,
    pub liveness: Liveness,
}

impl Verdict {
    pub fn new(entry: ClassifiedEntry, liveness: Liveness) -> Self {
        Self { entry, liveness }
    }

    pub fn reachable(&self) -> bool {
        self.liveness.is_reachable()
    }
}

/// Output record handed to the playlist serializer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub display_name: String,
    pub address: String,
    pub category: Category,
    pub source_priority: u8,
}

impl From<Verdict> for PlaylistEntry {
    fn from(verdict: Verdict) -> Self {
        let entry = verdict.entry;
        Self {
            display_name: entry.display_name,
            address: entry.raw.address,
            category: entry.category,
            source_priority: entry.raw.source_priority,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_entry_builder() {
        let entry = RawEntry::new("西充综合", "http://a.example/live.m3u8", 0, true)
            .with_source("api")
            .with_group_hint("  ")
            .with_category_override(Some(Category::Local));
        assert_eq!(entry.source, "api");
        assert_eq!(entry.group_hint, None);
        assert_eq!(entry.category_override, Some(Category::Local));
    }

    #[test]
    fn test_liveness_preference_order() {
        let v4 = Liveness::Reachable {
            family: AddressFamily::Ipv4,
        };
        let v6 = Liveness::Reachable {
            family: AddressFamily::Ipv6Only,
        };
        assert!(v4.preference() < v6.preference());
        assert!(v6.preference() < Liveness::Unchecked.preference());
        assert!(Liveness::Trusted.is_reachable());
        assert!(Liveness::Unchecked.is_reachable());
        assert!(
            !Liveness::Unreachable {
                reason: "timeout".into()
            }
            .is_reachable()
        );
    }
}
