//! Foreign channel filter
//!
//! Drops channels whose name matches a foreign broadcaster. The allow list is
//! consulted first, so permitted special-territory broadcasters survive even
//! when a deny keyword also matches.

use std::sync::Arc;

use crate::taxonomy::FilterTables;
use crate::taxonomy::tables::contains_any;

#[derive(Debug, Clone)]
pub struct ForeignFilter {
    tables: Arc<FilterTables>,
}

impl Default for ForeignFilter {
    fn default() -> Self {
        Self::new(Arc::new(FilterTables::builtin()))
    }
}

impl ForeignFilter {
    pub fn new(tables: Arc<FilterTables>) -> Self {
        Self { tables }
    }

    pub fn is_disallowed(&self, name: &str) -> bool {
        let lowered = name.trim().to_lowercase();
        if contains_any(&lowered, &self.tables.allowed) {
            return false;
        }
        contains_any(&lowered, &self.tables.denied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreign_broadcasters_are_disallowed() {
        let filter = ForeignFilter::default();
        assert!(filter.is_disallowed("BBC One"));
        assert!(filter.is_disallowed("CNN International"));
        assert!(filter.is_disallowed("nhk world"));
        assert!(!filter.is_disallowed("湖南卫视"));
        assert!(!filter.is_disallowed("CCTV-1"));
    }

    #[test]
    fn test_domestic_names_with_tv_prefix_are_allowed() {
        let filter = ForeignFilter::default();
        assert!(!filter.is_disallowed("CCTVNEWS"));
        assert!(!filter.is_disallowed("BTVNews"));
    }

    #[test]
    fn test_allow_list_is_checked_first() {
        let filter = ForeignFilter::default();
        assert!(!filter.is_disallowed("凤凰卫视"));
        assert!(!filter.is_disallowed("TVB翡翠台"));
        // Would hit the `fox` deny keyword without the allow entry
        assert!(!filter.is_disallowed("星空卫视 Fox"));
    }

    #[test]
    fn test_extended_tables() {
        let tables = FilterTables::builtin()
            .with_denied(["Deutsche Welle"])
            .with_allowed(["ABC Kids Local"]);
        let filter = ForeignFilter::new(Arc::new(tables));
        assert!(filter.is_disallowed("deutsche welle"));
        assert!(!filter.is_disallowed("abc kids local"));
        assert!(filter.is_disallowed("ABC News"));
    }
}
