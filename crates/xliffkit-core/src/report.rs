use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-group outcome of a combine run. Duplicates are split into exact
/// duplicates and real conflicts (same id, different content) so repeated
/// re-exports can be told apart from diverging translations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombineGroupStat {
    pub added: usize,
    pub skipped_identical: usize,
    pub skipped_conflicting: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombineReport {
    pub groups: BTreeMap<String, CombineGroupStat>,
}

impl CombineReport {
    pub fn total_added(&self) -> usize {
        self.groups.values().map(|s| s.added).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.groups
            .values()
            .map(|s| s.skipped_identical + s.skipped_conflicting)
            .sum()
    }

    pub fn total_conflicting(&self) -> usize {
        self.groups.values().map(|s| s.skipped_conflicting).sum()
    }
}

/// Missing-unit counts per baseline group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiffReport {
    pub groups: BTreeMap<String, usize>,
}

impl DiffReport {
    pub fn total_missing(&self) -> usize {
        self.groups.values().sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichReport {
    /// Units that received the extra slot.
    pub matched: usize,
    /// Units with no counterpart in the secondary store.
    pub unmatched: usize,
    /// Units whose counterpart had an empty translation; treated as unmatched.
    pub skipped_empty: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleReport {
    pub population: usize,
    pub requested: usize,
    pub selected: usize,
}
